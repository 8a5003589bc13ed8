// End-to-end scenarios for the resize cycle and the dictionary layer.
//
// - Growth: 12 keys fill a 16-bucket table to exactly 0.75; the 13th key
//   doubles it.
// - Shrink: a 32-bucket table at 0.25 halves when one more key goes.
// - Dictionary: update overwrites, erase of a missing key is an error.
use chain_hash::Dictionary;
use chain_hash::Error;
use chain_hash::HashMap;

#[test]
fn growth_at_thirteenth_key() {
    let mut map = HashMap::new();
    for i in 0..12u32 {
        assert!(map.insert(format!("key{i}"), i));
    }
    assert_eq!(map.capacity(), 16);
    assert_eq!(map.load_factor(), 0.75);

    assert!(map.insert("key12".to_string(), 12));
    assert_eq!(map.capacity(), 32);
    assert_eq!(map.len(), 13);
    for i in 0..13u32 {
        assert_eq!(map.at(format!("key{i}").as_str()), Ok(&i));
    }
}

#[test]
fn shrink_below_quarter_load() {
    let mut map = HashMap::new();
    for i in 0..13u32 {
        map.insert(i, i);
    }
    for i in 0..5u32 {
        assert!(map.erase(&i));
    }
    assert_eq!((map.len(), map.capacity()), (8, 32));
    assert_eq!(map.load_factor(), 0.25);

    assert!(map.erase(&5));
    assert_eq!((map.len(), map.capacity()), (7, 16));
    assert_eq!(map.load_factor(), 0.4375);
    for i in 6..13u32 {
        assert_eq!(map.at(&i), Ok(&i));
    }
}

#[test]
fn many_keys_then_back_to_floor() {
    let mut map = HashMap::new();
    for i in 0..10_000u32 {
        map.insert(i, ());
    }
    assert_eq!(map.capacity(), 16_384);
    for i in 0..10_000u32 {
        assert!(map.erase(&i));
    }
    assert!(map.is_empty());
    assert_eq!(map.capacity(), 16);
}

#[test]
fn insert_existing_and_index_assignment() {
    let mut map = HashMap::new();
    assert!(map.insert("k", 1));
    assert!(!map.insert("k", 2));
    assert_eq!(map.at("k"), Ok(&1));

    *map.index_or_default("k") = 3;
    assert_eq!(map.len(), 1);
    assert_eq!(map["k"], 3);
}

#[test]
fn mismatched_lengths_fail() {
    let result = HashMap::from_parallel(vec![1, 2, 3], vec!["a", "b"]);
    assert_eq!(
        result.unwrap_err(),
        Error::LengthMismatch { keys: 3, values: 2 }
    );
    assert!(Dictionary::from_parallel(vec!["a"], Vec::<String>::new()).is_err());
}

#[test]
fn empty_table_iteration() {
    let map: HashMap<u8, u8, _> = HashMap::new();
    assert!(map.begin() == map.end());
    assert_eq!(map.iter().count(), 0);
}

#[test]
fn iteration_visits_present_keys_once() {
    let keys: Vec<String> = (0..500).map(|i| format!("k{i}")).collect();
    let values: Vec<usize> = (0..500).collect();
    let mut map = HashMap::from_parallel(keys.clone(), values).unwrap();
    for key in keys.iter().step_by(3) {
        map.erase(key.as_str());
    }

    let mut visited: Vec<&String> = map.keys().collect();
    visited.sort();
    let mut expected: Vec<&String> = keys
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 3 != 0)
        .map(|(_, k)| k)
        .collect();
    expected.sort();
    assert_eq!(visited, expected);
}

#[test]
fn dictionary_update_overwrites() {
    let mut dict = Dictionary::from_parallel(["a", "b"], ["1", "2"]).unwrap();
    dict.update([("b", "20"), ("c", "3")]);
    assert_eq!(dict.at("b").unwrap(), "20");
    assert_eq!(dict.at("c").unwrap(), "3");
    assert_eq!(dict.len(), 3);
}

#[test]
fn dictionary_erase_is_strict() {
    let mut dict = Dictionary::from_parallel(["a", "b"], ["1", "2"]).unwrap();
    assert_eq!(dict.erase("missing"), Err(Error::InvalidKey));
    assert_eq!(dict.len(), 2);

    assert_eq!(dict.erase("a"), Ok(()));
    assert!(!dict.contains_key("a"));
    assert_eq!(dict.len(), 1);
}

#[test]
fn copies_are_deep_and_compare_by_content() {
    let mut original = HashMap::new();
    for i in 0..40 {
        original.insert(i, i * 2);
    }
    let copy = original.clone();
    assert_eq!(copy, original);
    assert_eq!(copy.capacity(), original.capacity());

    original.erase(&0);
    assert_ne!(copy, original);
    assert_eq!(copy.at(&0), Ok(&0));
}
