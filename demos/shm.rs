//! Cross-process transfer: a linear ring inside a shared anonymous mapping,
//! parent writing, forked child reading.

use std::time::Duration;

use ringview::{RingView, WORD_SIZE};

const BLOCK: usize = 64 + 2 * WORD_SIZE;

fn main() {
    let base = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            BLOCK,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_SHARED | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };
    assert_ne!(base, libc::MAP_FAILED, "mmap failed");

    // Build the view once; the fork below hands each process its own copy
    // over the same mapping.
    let mut ring = unsafe { RingView::linear(base.cast(), BLOCK) };
    assert!(ring.is_valid());

    match unsafe { libc::fork() } {
        -1 => panic!("fork failed"),
        0 => {
            let mut buf = [0u8; 12];
            let mut got = 0;
            while got < buf.len() {
                match ring.read(&mut buf[got..]) {
                    Ok(0) => std::thread::sleep(Duration::from_millis(1)),
                    Ok(n) => got += n,
                    Err(e) => panic!("child: {e}"),
                }
            }
            println!("child read: {}", String::from_utf8_lossy(&buf));
            std::process::exit(0);
        }
        child => {
            let n = ring.write(b"Hello World!").expect("fresh ring");
            println!("parent wrote {n} bytes");
            let mut status = 0;
            unsafe { libc::waitpid(child, &mut status, 0) };
            unsafe { libc::munmap(base, BLOCK) };
        }
    }
}
