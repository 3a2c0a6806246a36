//! Contract checks shared by every backend's tests.

use crate::traits::OrderedStore;

pub(crate) fn put_get_overwrite(store: &dyn OrderedStore) {
    assert_eq!(store.get(b"/studies/a").unwrap(), None);
    store.put(b"/studies/a", b"{\"v\":1}").unwrap();
    assert_eq!(store.get(b"/studies/a").unwrap(), Some(b"{\"v\":1}".to_vec()));
    store.put(b"/studies/a", b"{\"v\":2}").unwrap();
    assert_eq!(store.get(b"/studies/a").unwrap(), Some(b"{\"v\":2}".to_vec()));
}

pub(crate) fn delete_is_idempotent(store: &dyn OrderedStore) {
    store.put(b"k", b"v").unwrap();
    assert!(store.delete(b"k").unwrap());
    assert!(!store.delete(b"k").unwrap());
    assert!(!store.delete(b"never-written").unwrap());
    assert_eq!(store.get(b"k").unwrap(), None);
}

pub(crate) fn scan_is_ordered_and_pure(store: &dyn OrderedStore) {
    for key in [
        "/studies/b/trials/2",
        "/studies/a/trials/1",
        "/studies/ab/trials/1",
        "/studies/b/trials/1",
        "/studies/b/files/x",
        "/studies/b",
        "/xstudies/b/trials/1",
    ] {
        store.put(key.as_bytes(), key.as_bytes()).unwrap();
    }

    let keys: Vec<String> = store
        .scan_prefix(b"/studies/b/trials/")
        .unwrap()
        .into_iter()
        .map(|(k, _)| String::from_utf8(k).unwrap())
        .collect();
    assert_eq!(keys, vec!["/studies/b/trials/1", "/studies/b/trials/2"]);

    let a: Vec<_> = store.scan_prefix(b"/studies/a/").unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].0, b"/studies/a/trials/1".to_vec());
    assert_eq!(a[0].1, b"/studies/a/trials/1".to_vec());

    assert!(store.scan_prefix(b"/studies/c/").unwrap().is_empty());
    assert_eq!(store.scan_prefix(b"").unwrap().len(), 7);
}

pub(crate) fn scan_handles_high_bytes(store: &dyn OrderedStore) {
    store.put(&[0x01, 0xff], b"a").unwrap();
    store.put(&[0x01, 0xff, 0x00], b"b").unwrap();
    store.put(&[0x02], b"c").unwrap();
    store.put(&[0xff, 0xff], b"d").unwrap();
    store.put(&[0xff, 0xff, 0x10], b"e").unwrap();

    let under: Vec<_> = store.scan_prefix(&[0x01, 0xff]).unwrap();
    assert_eq!(under.len(), 2);
    assert_eq!(under[0].0, vec![0x01, 0xff]);
    assert_eq!(under[1].0, vec![0x01, 0xff, 0x00]);

    let top: Vec<_> = store.scan_prefix(&[0xff, 0xff]).unwrap();
    assert_eq!(top.len(), 2);
}

pub(crate) fn delete_batch_counts_existing(store: &dyn OrderedStore) {
    store.put(b"a", b"1").unwrap();
    store.put(b"b", b"2").unwrap();
    let removed = store
        .delete_batch(&[b"a".to_vec(), b"b".to_vec(), b"c".to_vec()])
        .unwrap();
    assert_eq!(removed, 2);
    assert!(store.scan_prefix(b"").unwrap().is_empty());
}
