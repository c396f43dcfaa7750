//! One block, two roles: a single-threaded round trip, a lock-free stream
//! between two threads, and the same stream behind a `LockedRing`.

use std::sync::Mutex;
use std::thread;

use ringview::{LockedRing, RingView, WORD_SIZE};

const CAPACITY: usize = 64;
const TOTAL: usize = 1 << 20;

fn main() {
    println!("ringview {}", ringview::version::version());

    let mut block = vec![0usize; 2 + CAPACITY / WORD_SIZE];
    let block_len = block.len() * WORD_SIZE;
    let mut producer = unsafe { RingView::linear(block.as_mut_ptr().cast(), block_len) };
    assert!(producer.is_valid());
    let mut consumer = producer.clone();

    // The classic smoke test.
    let written = producer.write(b"Hello World!").expect("fresh ring");
    println!("written({written}) bytes");
    let mut msg = [0u8; 12];
    let read = consumer.read(&mut msg).expect("fresh ring");
    println!("read({read}) bytes: {}", String::from_utf8_lossy(&msg[..read]));

    // Lock-free: one clone per role, short transfers retried with a yield.
    let data: Vec<u8> = (0..TOTAL).map(|i| (i % 251) as u8).collect();
    thread::scope(|s| {
        s.spawn(|| {
            let mut sent = 0;
            while sent < TOTAL {
                let n = producer.write(&data[sent..(sent + 48).min(TOTAL)]).unwrap();
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
                let n = consumer.read(&mut received[got..(got + 48).min(TOTAL)]).unwrap();
                got += n;
                if n == 0 {
                    thread::yield_now();
                }
            }
            assert_eq!(received, data, "byte stream corrupted");
        });
    });
    println!("lock-free: streamed {TOTAL} bytes intact");

    // Coarse-grained: the same block behind an injected mutex.
    let lock = Mutex::new(());
    let locked =
        unsafe { LockedRing::linear(block.as_mut_ptr().cast(), block_len, &lock) }.unwrap();
    thread::scope(|s| {
        s.spawn(|| {
            let mut sent = 0;
            while sent < TOTAL {
                sent += locked.write(&data[sent..(sent + 48).min(TOTAL)]).unwrap();
            }
        });
        s.spawn(|| {
            let mut received = vec![0u8; TOTAL];
            let mut got = 0;
            while got < TOTAL {
                got += locked.read(&mut received[got..(got + 48).min(TOTAL)]).unwrap();
            }
            assert_eq!(received, data, "byte stream corrupted");
        });
    });
    println!("locked: streamed {TOTAL} bytes intact");
}
