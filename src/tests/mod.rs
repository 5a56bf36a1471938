use crate::model::Comment;
use crate::pipeline::{self, SortKey, SortSpec};
use crate::state::{MemoryStorage, RowsPerPage, ViewState, ViewStateStore, PAGE_SIZE_OPTIONS};

const WORDS: [&str; 8] = [
    "laudantium", "Quidem", "odio", "ALIAS", "eos", "vero", "Magnam", "sit",
];

/// Deterministic pseudo-random comments; names and emails repeat so ties
/// show up in sorts.
fn generated(n: usize, seed: u64) -> Vec<Comment> {
    let mut x = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        x = x
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (x >> 33) as usize
    };
    (0..n)
        .map(|i| {
            let name = format!("{} {}", WORDS[next() % 8], WORDS[next() % 8]);
            let email = format!("{}@{}.biz", WORDS[next() % 8], WORDS[next() % 8]);
            let body = (0..6).map(|_| WORDS[next() % 8]).collect::<Vec<_>>().join(" ");
            Comment {
                id: i as u64 + 1,
                post_id: (next() % 20) as u64 + 1,
                name,
                email,
                body,
            }
        })
        .collect()
}

#[test]
fn filter_is_sound_and_complete() {
    let records = generated(200, 7);
    for search in ["", "quid", "ALIAS@", "eos vero", "Magnam.biz", "zzz"] {
        let needle = search.to_lowercase();
        let kept = pipeline::filter(&records, search);
        for c in &kept {
            assert!(
                c.name.to_lowercase().contains(&needle)
                    || c.email.to_lowercase().contains(&needle)
                    || c.body.to_lowercase().contains(&needle)
            );
        }
        for c in &records {
            if !kept.iter().any(|k| k.id == c.id) {
                assert!(!c.name.to_lowercase().contains(&needle));
                assert!(!c.email.to_lowercase().contains(&needle));
                assert!(!c.body.to_lowercase().contains(&needle));
            }
        }
    }
}

#[test]
fn empty_search_returns_input_in_order() {
    let records = generated(50, 3);
    let kept = pipeline::filter(&records, "");
    let ids: Vec<_> = kept.iter().map(|c| c.id).collect();
    let expected: Vec<_> = records.iter().map(|c| c.id).collect();
    assert_eq!(ids, expected);
}

#[test]
fn desc_is_reverse_of_asc_when_keys_are_unique() {
    let records: Vec<Comment> = (0..30u64)
        .map(|i| Comment {
            id: i,
            post_id: (i * 7919) % 1000,
            name: format!("Name{:03}", (i * 37) % 101),
            email: format!("mail{:03}@x.io", (i * 53) % 103),
            body: String::new(),
        })
        .collect();
    for key in SortKey::ALL {
        let asc = pipeline::sort(pipeline::filter(&records, ""), SortSpec::Asc(key));
        let mut desc = pipeline::sort(pipeline::filter(&records, ""), SortSpec::Desc(key));
        desc.reverse();
        let a: Vec<_> = asc.iter().map(|c| c.id).collect();
        let d: Vec<_> = desc.iter().map(|c| c.id).collect();
        assert_eq!(a, d, "key {key}");
    }
}

#[test]
fn sorts_are_stable_on_generated_data() {
    let records = generated(300, 11);
    for key in SortKey::ALL {
        for spec in [SortSpec::Asc(key), SortSpec::Desc(key)] {
            let sorted = pipeline::sort(pipeline::filter(&records, ""), spec);
            for pair in sorted.windows(2) {
                let ord = key.compare(pair[0], pair[1]);
                match spec {
                    SortSpec::Asc(_) => assert!(ord.is_le()),
                    _ => assert!(ord.is_ge()),
                }
                if ord.is_eq() {
                    assert!(pair[0].id < pair[1].id, "tie reordered for {key}");
                }
            }
        }
    }
}

#[test]
fn pages_partition_the_result_for_every_page_size() {
    let records = generated(237, 5);
    for search in ["", "eos", "sit@"] {
        let total = pipeline::filter(&records, search).len();
        for p in PAGE_SIZE_OPTIONS {
            let first = pipeline::run(&records, search, SortSpec::Asc(SortKey::Name), 0, p);
            assert_eq!(first.total, total);
            assert_eq!(first.total_pages, total.div_ceil(p));
            let mut seen = Vec::new();
            for i in 0..first.total_pages {
                let page = pipeline::run(&records, search, SortSpec::Asc(SortKey::Name), i, p);
                seen.extend(page.visible.into_iter().map(|c| c.id));
            }
            assert_eq!(seen.len(), total);
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), total);
        }
    }
}

#[test]
fn twenty_five_records_ten_per_page() {
    let records = generated(25, 1);
    let view = pipeline::run(&records, "", SortSpec::Unsorted, 2, 10);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.visible.len(), 5);
    assert_eq!(view.range_start(), Some(21));
    assert_eq!(view.range_end(), Some(25));
}

#[test]
fn full_pipeline_is_deterministic() {
    let records = generated(120, 9);
    let spec = SortSpec::Desc(SortKey::Email);
    assert_eq!(
        pipeline::run(&records, "o", spec, 1, 50),
        pipeline::run(&records, "o", spec, 1, 50)
    );
}

#[test]
fn persisted_state_round_trips_for_every_shape() {
    let mut store = ViewStateStore::new(MemoryStorage::new());
    let sorts = [
        SortSpec::Unsorted,
        SortSpec::Asc(SortKey::PostId),
        SortSpec::Desc(SortKey::Name),
        SortSpec::Asc(SortKey::Email),
    ];
    for rows in PAGE_SIZE_OPTIONS {
        for sort in sorts {
            let state = ViewState {
                page: rows / 10,
                rows_per_page: RowsPerPage::try_from(rows).unwrap(),
                search: format!("ünïcode \"quoted\" {rows}"),
                sort,
            };
            store.save(&state).unwrap();
            assert_eq!(store.load(), state);
        }
    }
}

#[test]
fn corrupt_storage_yields_exact_defaults() {
    use crate::state::StorageBackend;

    for blob in [
        "",
        "null",
        "[]",
        "{}",
        "not json at all",
        r#"{"page":0,"rowsPerPage":10,"search":"","sort":"name"}"#,
    ] {
        let mut backend = MemoryStorage::new();
        backend.set_item(crate::state::store::STATE_KEY, blob).unwrap();
        let loaded = ViewStateStore::new(backend).load();
        assert_eq!(loaded.page, 0);
        assert_eq!(loaded.rows_per_page.get(), 10);
        assert_eq!(loaded.search, "");
        assert_eq!(loaded.sort, SortSpec::Unsorted);
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_a_request_error() {
    let fetcher = crate::fetcher::HttpFetcher::new(crate::fetcher::FetcherOptions {
        comments_url: "http://127.0.0.1:9/comments".to_string(),
        users_url: "http://127.0.0.1:9/users".to_string(),
        timeout_seconds: 2,
        proxy: None,
    })
    .unwrap();
    let err = fetcher.fetch_comments().await.unwrap_err();
    assert!(matches!(err, crate::fetcher::FetchError::Request { .. }));
}
