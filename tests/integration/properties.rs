//! Property tests for the aggregations

use chrono::{Duration, NaiveDateTime};
use harbor_analyst::diagnostics::Diagnostics;
use harbor_analyst::error::AnalystError;
use harbor_analyst::output::BarChartable;
use harbor_analyst::registry::{parse_timestamp, Log, Operation, Project, Registry, Repository, User};
use harbor_analyst::stats::{HourOfDayParameters, TopRepositoriesParameters, TopUsersParameters};
use proptest::prelude::*;

/// (repository index, user id, minutes after the base time)
type PushSpec = (usize, i64, i64);

fn base_time() -> NaiveDateTime {
    parse_timestamp("2024-01-01 00:00:00").unwrap()
}

fn build_registry(repository_count: usize, pushes: &[PushSpec]) -> Registry {
    let mut project = Project::new(1, "demo");
    for index in 0..repository_count {
        let name = format!("repo-{index}");
        project
            .repositories
            .insert(name.clone(), Repository::new(index as i64, name));
    }

    for (log_id, (repository, user, minutes)) in pushes.iter().enumerate() {
        let name = format!("repo-{}", repository % repository_count);
        if let Some(repository) = project.repositories.get_mut(&name) {
            repository.tag_mut("latest").record(Log {
                id: log_id as i64,
                operation: Operation::Push,
                timestamp: base_time() + Duration::minutes(*minutes),
                user: Some(*user),
            });
        }
    }

    let mut registry = Registry::default();
    registry.projects.insert(1, project);
    for id in 0..5 {
        registry.users.insert(id, User { id, name: format!("user-{id}") });
    }
    registry
}

fn push_specs() -> impl Strategy<Value = Vec<PushSpec>> {
    prop::collection::vec((0usize..8, 0i64..5, 0i64..(14 * 24 * 60)), 0..200)
}

proptest! {
    #[test]
    fn hours_are_strictly_ascending_and_non_zero(pushes in push_specs(), offset in 0i64..(14 * 24 * 60)) {
        let registry = build_registry(8, &pushes);
        let params = HourOfDayParameters { start_date: base_time() + Duration::minutes(offset) };
        let result = registry.pushes_by_hour_of_day(&params, &mut Diagnostics::new()).unwrap();

        let entries = result.entries();
        prop_assert!(entries.windows(2).all(|pair| pair[0].hour < pair[1].hour));
        prop_assert!(entries.iter().all(|entry| entry.count > 0 && entry.hour < 24));

        let kept = pushes.iter().filter(|(_, _, minutes)| *minutes >= offset).count() as u64;
        prop_assert_eq!(result.total(), kept);
    }

    #[test]
    fn push_exactly_at_start_is_kept(minutes in 0i64..(14 * 24 * 60)) {
        let registry = build_registry(1, &[(0, 1, minutes)]);
        let params = TopRepositoriesParameters {
            start_date: base_time() + Duration::minutes(minutes),
            max_elements: 1,
            ignore_repository_names: Vec::new(),
        };
        let result = registry.top_pushed_repositories(&params, &mut Diagnostics::new()).unwrap();
        prop_assert_eq!(result.ordered_bar_chart_values()[0].value, 1);
    }

    #[test]
    fn top_repositories_respect_max_elements(pushes in push_specs(), max_elements in 1i64..12) {
        let registry = build_registry(8, &pushes);
        let params = TopRepositoriesParameters {
            start_date: base_time(),
            max_elements,
            ignore_repository_names: Vec::new(),
        };
        let values = registry
            .top_pushed_repositories(&params, &mut Diagnostics::new())
            .unwrap()
            .ordered_bar_chart_values();

        prop_assert_eq!(values.len(), (max_elements as usize).min(8));
        let ordered = values.windows(2).all(|pair| {
            pair[0].value > pair[1].value || (pair[0].value == pair[1].value && pair[0].label < pair[1].label)
        });
        prop_assert!(ordered);
    }

    #[test]
    fn top_users_respect_max_elements(pushes in push_specs(), max_elements in 1i64..8) {
        let registry = build_registry(8, &pushes);
        let params = TopUsersParameters {
            start_date: base_time(),
            max_elements,
            ignore_user_names: vec!["user-0".to_string()],
        };
        let values = registry
            .top_pushing_users(&params, &mut Diagnostics::new())
            .unwrap()
            .ordered_bar_chart_values();

        let active_users = pushes
            .iter()
            .filter(|(_, user, _)| *user != 0)
            .map(|(_, user, _)| *user)
            .collect::<std::collections::BTreeSet<_>>()
            .len();
        prop_assert_eq!(values.len(), (max_elements as usize).min(active_users));
        prop_assert!(values.iter().all(|v| v.label != "user-0"));
        prop_assert!(values.windows(2).all(|pair| pair[0].value >= pair[1].value));
    }

    #[test]
    fn non_positive_max_elements_is_rejected(max_elements in -100i64..=0) {
        let registry = build_registry(2, &[]);
        let repositories = TopRepositoriesParameters {
            start_date: base_time(),
            max_elements,
            ignore_repository_names: Vec::new(),
        };
        let users = TopUsersParameters {
            start_date: base_time(),
            max_elements,
            ignore_user_names: Vec::new(),
        };

        let is_invalid = |err: AnalystError| matches!(err, AnalystError::InvalidParameters { .. });
        prop_assert!(is_invalid(registry.top_pushed_repositories(&repositories, &mut Diagnostics::new()).unwrap_err()));
        prop_assert!(is_invalid(registry.top_pushing_users(&users, &mut Diagnostics::new()).unwrap_err()));
    }
}
