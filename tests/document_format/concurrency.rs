//! One store shared across threads.

use crate::common::*;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn concurrent_writers_and_readers() {
    const THREADS: usize = 8;
    const ROUNDS: i64 = 20;

    let source = MemorySource::new();
    let store = Arc::new(DocumentStore::create(source.clone(), StoreConfig::default()).unwrap());
    store.write(false).unwrap();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            let source = source.clone();
            thread::spawn(move || {
                barrier.wait();
                for round in 0..ROUNDS {
                    store
                        .with_document_mut(|doc| {
                            doc.root_object_mut()
                                .add(TypedValue::new(format!("t{}", t), round))
                                .unwrap();
                        })
                        .unwrap();
                    store.write(false).unwrap();
                    if round % 5 == 0 {
                        // Every persisted snapshot must decode cleanly
                        let bytes = source.bytes().unwrap();
                        Document::from_bytes(&bytes).unwrap();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    store.write(true).unwrap();
    let reader = DocumentStore::open(source, StoreConfig::default()).unwrap();
    reader.read(false).unwrap();
    let root = reader.with_document(|doc| doc.root_object().clone()).unwrap();
    assert_eq!(root.len(), THREADS);
    for t in 0..THREADS {
        assert_eq!(
            root.get(&format!("t{}", t)).unwrap().as_long(),
            Some(ROUNDS - 1)
        );
    }
}

#[test]
fn concurrent_reads_of_one_file() {
    let test = TestStore::create(StoreConfig::default());
    test.store
        .with_document_mut(|doc| {
            doc.root_object_mut()
                .add(TypedValue::new("shared", "value"))
                .unwrap();
        })
        .unwrap();
    test.store.write(false).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&test.store);
            thread::spawn(move || {
                store.read(true).unwrap();
                store
                    .with_document(|doc| doc.root_object().contains("shared"))
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
