use crate::search::{search, SearchConfig, SearchError, ThreadMode};

fn config(threads: ThreadMode) -> SearchConfig {
    SearchConfig::new("!...", "0")
        .with_required("@")
        .with_available(".@")
        .with_prefix_ticks(0)
        .with_threads(threads)
}

#[test]
fn finds_every_terminating_placement() {
    for threads in [ThreadMode::Sequential, ThreadMode::Pool(2)] {
        let report = search(&config(threads)).unwrap();
        assert_eq!(
            report.solutions,
            vec!["!..@", "!.@.", "!.@@", "!@..", "!@.@", "!@@.", "!@@@"]
        );
        assert_eq!(report.subsets, 3);
        assert_eq!(report.candidates, 7);
        assert_eq!(report.skipped, 5);
    }
}

#[test]
fn unreachable_targets_find_nothing() {
    let report = search(&SearchConfig {
        target: "1".into(),
        ..config(ThreadMode::Sequential)
    })
    .unwrap();
    assert!(report.solutions.is_empty());
    assert_eq!(report.candidates, 7);
}

#[test]
fn prefix_ticks_run_before_forking() {
    // The base interpreter has already printed the `0` before any candidate
    // is placed, so the candidates only need to halt.
    let report = search(
        &SearchConfig::new("!...", "0")
            .with_required("@")
            .with_available(".")
            .with_prefix_ticks(1)
            .with_threads(ThreadMode::Sequential),
    )
    .unwrap();
    assert_eq!(report.solutions, vec!["!..@", "!.@.", "!@.."]);
}

#[test]
fn required_characters_need_free_cells() {
    let err = search(&SearchConfig::new("!", "0").with_required("@@")).unwrap_err();
    assert!(matches!(
        err,
        SearchError::NotEnoughSlots {
            empty: 0,
            required: 2
        }
    ));
}
