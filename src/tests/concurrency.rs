use std::sync::Mutex;
use std::thread;
use std::vec;
use std::vec::Vec;

use super::Block;
use crate::{LockedRing, RawLock};

const TOTAL: usize = 200_000;

fn sequence(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Lock-free SPSC: one clone per role, byte stream integrity across laps.
#[test]
fn spsc_clones_preserve_the_byte_stream() {
    let block = Block::new(64);
    let mut producer = block.ring();
    let mut consumer = producer.clone();
    let data = sequence(TOTAL);

    thread::scope(|s| {
        s.spawn(|| {
            let mut sent = 0;
            while sent < TOTAL {
                let end = (sent + 57).min(TOTAL);
                let n = producer.write(&data[sent..end]).expect("writer saw corruption");
                sent += n;
                if n == 0 {
                    thread::yield_now();
                }
            }
        });

        s.spawn(|| {
            let mut received = vec![0u8; TOTAL];
            let mut got = 0;
            while got < TOTAL {
                let end = (got + 71).min(TOTAL);
                let n = consumer.read(&mut received[got..end]).expect("reader saw corruption");
                got += n;
                if n == 0 {
                    thread::yield_now();
                }
            }
            assert_eq!(received, data);
        });
    });
}

/// `len` observed from a third context never exceeds the capacity.
#[test]
fn spsc_len_stays_in_bounds() {
    let block = Block::new(64);
    let mut producer = block.ring();
    let mut consumer = producer.clone();
    let watcher = producer.clone();

    thread::scope(|s| {
        s.spawn(|| {
            let data = sequence(20_000);
            let mut sent = 0;
            while sent < data.len() {
                sent += producer.write(&data[sent..]).unwrap();
                thread::yield_now();
            }
        });

        s.spawn(|| {
            let mut got = 0;
            let mut buf = [0u8; 96];
            while got < 20_000 {
                got += consumer.read(&mut buf).unwrap();
                thread::yield_now();
            }
        });

        s.spawn(|| {
            for _ in 0..1_000 {
                let len = watcher.len();
                assert!(len <= 64, "len {len} exceeds capacity");
                thread::yield_now();
            }
        });
    });
}

/// Newtype so the test works with or without the crate's `std` feature.
struct TestLock(Mutex<()>);

impl RawLock for TestLock {
    fn with<R>(&self, f: impl FnOnce() -> R) -> R {
        let _guard = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        f()
    }
}

/// One `LockedRing` shared by reference between both roles.
#[test]
fn locked_ring_serializes_both_roles() {
    let block = Block::new(64);
    let lock = TestLock(Mutex::new(()));
    let ring = unsafe { LockedRing::linear(block.base(), block.byte_len(), &lock) }
        .expect("layout is valid");

    let data = sequence(50_000);

    thread::scope(|s| {
        s.spawn(|| {
            let mut sent = 0;
            while sent < data.len() {
                let n = ring.write(&data[sent..(sent + 33).min(data.len())]).unwrap();
                sent += n;
                if n == 0 {
                    thread::yield_now();
                }
            }
        });

        s.spawn(|| {
            let mut received = vec![0u8; data.len()];
            let mut got = 0;
            while got < data.len() {
                let n = ring.read(&mut received[got..(got + 29).min(data.len())]).unwrap();
                got += n;
                if n == 0 {
                    thread::yield_now();
                }
            }
            assert_eq!(received, data);
        });
    });

    assert!(ring.is_empty());
}
