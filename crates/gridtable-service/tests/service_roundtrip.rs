//! End-to-end flow through the whole stack: record service on top of the
//! typed client, segmented scanner, and the embedded memory backend with
//! a small segment size so every scan crosses segment boundaries.

use gridtable_service::{RecordService, StatusCode, TableModel};
use gridtable_store::test_utils::person::PersonEntity;
use gridtable_store::{Filter, MemoryBackend};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Person {
    partition_key: Option<String>,
    row_key: Option<String>,
    name: Option<String>,
    city: Option<String>,
    age: Option<i64>,
}

impl Person {
    fn keyed(partition_key: &str, row_key: &str) -> Self {
        Person {
            partition_key: Some(partition_key.to_string()),
            row_key: Some(row_key.to_string()),
            name: None,
            city: None,
            age: None,
        }
    }
}

impl TableModel for Person {
    type Entity = PersonEntity;

    fn partition_key(&self) -> Option<&str> {
        self.partition_key.as_deref()
    }

    fn row_key(&self) -> Option<&str> {
        self.row_key.as_deref()
    }

    fn to_entity(&self) -> PersonEntity {
        PersonEntity {
            partition_key: self.partition_key.clone(),
            row_key: self.row_key.clone(),
            name: self.name.clone(),
            city: self.city.clone(),
            age: self.age,
        }
    }

    fn from_entity(entity: PersonEntity) -> Self {
        Person {
            partition_key: entity.partition_key,
            row_key: entity.row_key,
            name: entity.name,
            city: entity.city,
            age: entity.age,
        }
    }

    fn example_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(city) = &self.city {
            pairs.push(("city", city.clone()));
        }
        if let Some(age) = self.age {
            pairs.push(("age", age.to_string()));
        }
        pairs
    }
}

fn seeded_service(rows: usize) -> RecordService<Person> {
    let backend = Arc::new(MemoryBackend::with_segment_size(3));
    let service = RecordService::new(backend).unwrap();
    for i in 0..rows {
        let mut person = Person::keyed("dept-a", &format!("emp{:03}", i));
        person.name = Some(format!("Employee {i}"));
        person.city = Some(if i % 2 == 0 { "Oslo" } else { "Bergen" }.to_string());
        person.age = Some(20 + i as i64);
        assert_eq!(service.insert(&person), StatusCode::Created);
    }
    service
}

#[test]
fn full_lifecycle_across_segments() {
    let service = seeded_service(23);

    // Everything is there, counted through the key-only projection scan.
    assert_eq!(service.client().count().unwrap(), 23);

    // Page 1 and the clamped past-the-end page.
    let page = service.get_page(10, 1, Some("dept-a"), None).unwrap();
    assert_eq!((page.current, page.total, page.rows.len()), (1, 23, 10));

    let clamped = service.get_page(10, 5, Some("dept-a"), None).unwrap();
    assert_eq!((clamped.current, clamped.rows.len()), (3, 3));
    assert_eq!(clamped.rows[0].row_key.as_deref(), Some("emp020"));

    // Filtered retrieval by example crosses segment boundaries too.
    let mut sample = Person::keyed("dept-a", "unused");
    sample.row_key = None;
    sample.city = Some("Oslo".to_string());
    assert_eq!(service.get_by_example(&sample).len(), 12);

    // Top-N with a final partial segment: cap 3, count 7.
    let top = service.client().query_top(7, Some("dept-a"), None).unwrap();
    assert_eq!(top.len(), 7);

    // Partial update, then whole-model update with null meaning unset.
    let mut rename = Person::keyed("dept-a", "emp000");
    rename.name = Some("Renamed".to_string());
    rename.age = Some(99);
    assert_eq!(service.update_fields(&rename, &["name"]), StatusCode::Ok);

    let stored = service.get(&Person::keyed("dept-a", "emp000")).unwrap();
    assert_eq!(stored.name.as_deref(), Some("Renamed"));
    assert_eq!(stored.age, Some(20));

    let mut relocate = Person::keyed("dept-a", "emp000");
    relocate.city = Some("Trondheim".to_string());
    assert_eq!(service.update_whole(&relocate), StatusCode::Ok);

    let stored = service.get(&Person::keyed("dept-a", "emp000")).unwrap();
    assert_eq!(stored.name.as_deref(), Some("Renamed"));
    assert_eq!(stored.city.as_deref(), Some("Trondheim"));

    // Remove and verify absence through both lookup shapes.
    assert_eq!(service.remove(&Person::keyed("dept-a", "emp000")), StatusCode::Ok);
    assert!(service.get(&Person::keyed("dept-a", "emp000")).is_none());
    let mut by_row = Person::keyed("dept-a", "emp000");
    by_row.partition_key = None;
    assert!(service.get(&by_row).is_none());
    assert_eq!(service.client().count().unwrap(), 22);
}

#[test]
fn conflict_and_not_found_paths() {
    let service = seeded_service(3);

    assert_eq!(service.insert(&Person::keyed("dept-a", "emp001")), StatusCode::Conflict);
    assert_eq!(
        service.update_fields(&Person::keyed("dept-a", "ghost"), &["name"]),
        StatusCode::NotFound
    );
    assert_eq!(service.remove(&Person::keyed("dept-a", "ghost")), StatusCode::NotFound);
}

#[test]
fn filtered_scan_through_client_filter() {
    let service = seeded_service(9);
    let bergen = service.get_all(Some("dept-a"), Some(Filter::equal("City", "Bergen")));
    assert_eq!(bergen.len(), 4);
    assert!(bergen.iter().all(|p| p.city.as_deref() == Some("Bergen")));
}
