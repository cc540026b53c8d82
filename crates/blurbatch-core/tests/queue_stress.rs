//! Randomized checks of the bounded queue under contention.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use blurbatch_core::BoundedQueue;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn matches_a_fifo_model_under_random_interleaving() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for capacity in [1, 2, 7, 32] {
        let queue = BoundedQueue::new(capacity);
        let mut model = VecDeque::new();
        let mut next = 0u32;

        for _ in 0..2_000 {
            let can_push = model.len() < capacity;
            let can_pop = !model.is_empty();
            if can_push && (!can_pop || rng.gen_bool(0.5)) {
                queue.push(next).unwrap();
                model.push_back(next);
                next += 1;
            } else {
                assert_eq!(queue.pop(), model.pop_front());
            }
            assert_eq!(queue.len(), model.len());
            assert!(queue.len() <= capacity);
        }
    }
}

#[test]
fn many_producers_and_consumers_finish_without_deadlock() {
    const PRODUCERS: usize = 4;
    const CONSUMERS: usize = 6;
    const PER_PRODUCER: usize = 400;

    let (done_tx, done_rx) = mpsc::channel();

    thread::spawn(move || {
        let queue = Arc::new(BoundedQueue::new(3));

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut rng = rand::thread_rng();
                    for seq in 0..PER_PRODUCER {
                        if rng.gen_ratio(1, 20) {
                            thread::sleep(Duration::from_micros(rng.gen_range(0..300)));
                        }
                        queue.push((p, seq)).unwrap();
                    }
                })
            })
            .collect();

        let consumers: Vec<_> = (0..CONSUMERS)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    let mut rng = rand::thread_rng();
                    let mut seen = Vec::new();
                    while let Some(item) = queue.pop() {
                        if rng.gen_ratio(1, 20) {
                            thread::sleep(Duration::from_micros(rng.gen_range(0..300)));
                        }
                        seen.push(item);
                    }
                    seen
                })
            })
            .collect();

        for producer in producers {
            producer.join().unwrap();
        }
        queue.close();

        let per_consumer: Vec<Vec<(usize, usize)>> =
            consumers.into_iter().map(|c| c.join().unwrap()).collect();
        done_tx.send(per_consumer).unwrap();
    });

    let per_consumer = done_rx
        .recv_timeout(Duration::from_secs(60))
        .expect("queue deadlocked");

    // Each consumer sees any one producer's items in push order.
    for seen in &per_consumer {
        let mut last = vec![None; PRODUCERS];
        for &(p, seq) in seen {
            assert!(last[p].map_or(true, |prev| prev < seq));
            last[p] = Some(seq);
        }
    }

    // Every item delivered exactly once.
    let mut all: Vec<_> = per_consumer.into_iter().flatten().collect();
    all.sort_unstable();
    let expected: Vec<_> = (0..PRODUCERS)
        .flat_map(|p| (0..PER_PRODUCER).map(move |seq| (p, seq)))
        .collect();
    assert_eq!(all, expected);
}
