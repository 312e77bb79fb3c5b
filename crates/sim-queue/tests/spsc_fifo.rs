// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use sim_queue::Queue;

/// spec.md §8 scenario 6: producer pushes `[0, 1, ..., 100_000]`, consumer
/// pops in a loop, and the concatenation of `pop_batch` results equals the
/// pushed sequence.
#[test]
fn spsc_fifo_under_load() {
    let queue = Queue::<u64>::new();
    std::thread::scope(|scope| {
        let mut producer = queue.acquire_producer().unwrap();
        let mut consumer = queue.acquire_consumer().unwrap();

        let producer_handle = scope.spawn(move || {
            for i in 0..=100_000u64 {
                producer.push(i);
            }
        });

        let consumer_handle = scope.spawn(move || {
            let mut received = Vec::with_capacity(100_001);
            while received.len() < 100_001 {
                let mut batch = Vec::new();
                consumer.pop_batch(&mut batch, 1024);
                received.extend(batch);
            }
            received
        });

        producer_handle.join().unwrap();
        let received = consumer_handle.join().unwrap();
        assert_eq!(received, (0..=100_000u64).collect::<Vec<_>>());
    });
}

#[test]
fn popped_sequence_is_always_a_prefix_of_pushed_sequence() {
    let queue = Queue::<u32>::new();
    std::thread::scope(|scope| {
        let mut producer = queue.acquire_producer().unwrap();
        let mut consumer = queue.acquire_consumer().unwrap();

        let producer_handle = scope.spawn(move || {
            for i in 0..5_000u32 {
                producer.push(i);
                if i % 7 == 0 {
                    std::thread::yield_now();
                }
            }
        });

        let consumer_handle = scope.spawn(move || {
            let mut received = Vec::new();
            loop {
                match consumer.pop() {
                    Some(v) => received.push(v),
                    None => {
                        if received.len() == 5_000 {
                            break;
                        }
                        std::thread::yield_now();
                    }
                }
            }
            received
        });

        producer_handle.join().unwrap();
        let received = consumer_handle.join().unwrap();
        assert_eq!(received, (0..5_000u32).collect::<Vec<_>>());
    });
}
