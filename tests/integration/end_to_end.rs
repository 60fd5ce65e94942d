//! End-to-end scenarios from CSV text to chart values
//!
//! Exercises the library the way the binary does: parse export records,
//! build the registry, bind chart configuration and run each statistic.

use chrono::NaiveDateTime;
use harbor_analyst::diagnostics::{DiagnosticKind, Diagnostics};
use harbor_analyst::error::AnalystError;
use harbor_analyst::input::{self, RecordSets};
use harbor_analyst::output::{BarChartValue, BarChartable};
use harbor_analyst::registry::{parse_timestamp, Operation, RegistryBuilder};
use harbor_analyst::stats::{self, HourOfDayParameters, TopRepositoriesParameters, TopUsersParameters};

const PROJECTS: &str = "project_id,owner_id,name,deleted,public\n1,1,demo,f,t\n";
const REPOSITORIES: &str = "repository_id,name,project_id,owner_id\n10,app,1,1\n";
const USERS: &str = "user_id,username\n1,alice\n2,bob\n";
const ACCESS_LOG: &str = "\
log_id,user_id,project_id,repo_name,repo_tag,operation,op_time
100,1,1,app,latest,push,2024-01-01 08:00:00
101,2,1,app,latest,push,2024-01-01 09:00:00
";

fn record_sets(projects: &str, repositories: &str, users: &str, access_log: &str) -> RecordSets {
    RecordSets {
        projects: input::parse_records("project.csv", projects, input::PROJECT_FIELDS).unwrap(),
        repositories: input::parse_records("repository.csv", repositories, input::REPOSITORY_FIELDS).unwrap(),
        users: input::parse_records("user.csv", users, input::USER_FIELDS).unwrap(),
        access_logs: input::parse_records("access_log.csv", access_log, input::ACCESS_LOG_FIELDS).unwrap(),
    }
}

fn start() -> NaiveDateTime {
    parse_timestamp("2024-01-01 00:00:00").unwrap()
}

#[test]
fn test_hour_of_day_scenario() {
    let mut diagnostics = Diagnostics::new();
    let registry = RegistryBuilder::build(&record_sets(PROJECTS, REPOSITORIES, USERS, ACCESS_LOG), &mut diagnostics)
        .unwrap();
    assert!(diagnostics.is_empty());

    let params = HourOfDayParameters { start_date: start() };
    let result = registry.pushes_by_hour_of_day(&params, &mut diagnostics).unwrap();

    assert_eq!(
        result.ordered_bar_chart_values(),
        vec![BarChartValue::new("8:00", 1), BarChartValue::new("9:00", 1)]
    );
}

#[test]
fn test_top_users_tie_resolved_alphabetically() {
    let mut diagnostics = Diagnostics::new();
    let registry = RegistryBuilder::build(&record_sets(PROJECTS, REPOSITORIES, USERS, ACCESS_LOG), &mut diagnostics)
        .unwrap();

    let params = TopUsersParameters {
        start_date: start(),
        max_elements: 1,
        ignore_user_names: Vec::new(),
    };
    let result = registry.top_pushing_users(&params, &mut diagnostics).unwrap();

    assert_eq!(result.ordered_bar_chart_values(), vec![BarChartValue::new("alice", 1)]);
}

#[test]
fn test_create_for_unknown_project_is_only_a_warning() {
    let access_log = format!("{}200,1,42,app,N/A,create,2024-01-01 07:00:00\n", ACCESS_LOG);
    let mut diagnostics = Diagnostics::new();
    let registry = RegistryBuilder::build(&record_sets(PROJECTS, REPOSITORIES, USERS, &access_log), &mut diagnostics)
        .unwrap();

    assert_eq!(diagnostics.warning_count(), 1);
    assert_eq!(
        diagnostics.warnings().next().map(|d| d.kind.clone()),
        Some(DiagnosticKind::UnresolvedProject { project_id: 42 })
    );

    let params = TopRepositoriesParameters {
        start_date: start(),
        max_elements: 5,
        ignore_repository_names: Vec::new(),
    };
    let result = registry.top_pushed_repositories(&params, &mut diagnostics).unwrap();
    assert_eq!(result.ordered_bar_chart_values(), vec![BarChartValue::new("app", 2)]);
}

#[test]
fn test_repository_with_unknown_project_aborts_build() {
    let repositories = "repository_id,name,project_id,owner_id\n10,app,1,1\n11,orphan,7,1\n";
    let mut diagnostics = Diagnostics::new();
    let err = RegistryBuilder::build(&record_sets(PROJECTS, repositories, USERS, ACCESS_LOG), &mut diagnostics)
        .unwrap_err();

    match err {
        AnalystError::MalformedRecord { source_name, line, .. } => {
            assert_eq!(source_name, "repository.csv");
            assert_eq!(line, 3);
        }
        other => panic!("expected MalformedRecord, got {other:?}"),
    }
}

#[test]
fn test_unparseable_timestamp_aborts_build() {
    let access_log = format!("{}102,1,1,app,latest,push,yesterday\n", ACCESS_LOG);
    let mut diagnostics = Diagnostics::new();
    let err = RegistryBuilder::build(&record_sets(PROJECTS, REPOSITORIES, USERS, &access_log), &mut diagnostics)
        .unwrap_err();
    assert!(matches!(err, AnalystError::MalformedRecord { line: 4, .. }));
}

#[test]
fn test_non_numeric_user_id_is_fatal_but_unknown_user_is_not() {
    let unknown = format!("{}102,9,1,app,latest,push,2024-01-01 10:00:00\n", ACCESS_LOG);
    let mut diagnostics = Diagnostics::new();
    let registry = RegistryBuilder::build(&record_sets(PROJECTS, REPOSITORIES, USERS, &unknown), &mut diagnostics)
        .unwrap();
    assert_eq!(registry.log_count(Operation::Push), 3);
    assert_eq!(diagnostics.warning_count(), 1);

    let malformed = format!("{}102,nobody,1,app,latest,push,2024-01-01 10:00:00\n", ACCESS_LOG);
    let mut diagnostics = Diagnostics::new();
    let err = RegistryBuilder::build(&record_sets(PROJECTS, REPOSITORIES, USERS, &malformed), &mut diagnostics)
        .unwrap_err();
    assert!(matches!(err, AnalystError::MalformedRecord { .. }));
}

#[test]
fn test_configured_charts_produce_titled_results() {
    let mut diagnostics = Diagnostics::new();
    let registry = RegistryBuilder::build(&record_sets(PROJECTS, REPOSITORIES, USERS, ACCESS_LOG), &mut diagnostics)
        .unwrap();

    let charts: Vec<serde_yaml::Mapping> = serde_yaml::from_str(
        r#"
- statsMethodName: GetPushesPerDaytimes
  titleTemplate: "Pushes per hour since {{ startDate }}"
  timePeriodInDays: 1
- statsMethodName: TopPushingUsers
  titleTemplate: "Top users"
  timePeriodInDays: 1
  MaxNumberOfElements: 5
  ignoreUserNames: bob
"#,
    )
    .unwrap();
    let now = parse_timestamp("2024-01-02 00:00:00").unwrap();
    let plan = stats::bind_charts(&charts, now).unwrap();

    let hours = plan[0].call(&registry, &mut diagnostics).unwrap();
    assert_eq!(hours.title().unwrap(), "Pushes per hour since 2024-01-01");
    assert_eq!(hours.ordered_bar_chart_values().len(), 2);

    let users = plan[1].call(&registry, &mut diagnostics).unwrap();
    assert_eq!(users.title().unwrap(), "Top users");
    assert_eq!(users.ordered_bar_chart_values(), vec![BarChartValue::new("alice", 1)]);
}

#[test]
fn test_invalid_max_elements_fails_statistic() {
    let charts: Vec<serde_yaml::Mapping> = serde_yaml::from_str(
        r#"
- statsMethodName: TopPushedRepositories
  titleTemplate: "Top repositories"
  timePeriodInDays: 30
  maxElements: 0
"#,
    )
    .unwrap();
    let now = parse_timestamp("2024-01-02 00:00:00").unwrap();
    let plan = stats::bind_charts(&charts, now).unwrap();

    let mut diagnostics = Diagnostics::new();
    let registry = RegistryBuilder::build(&record_sets(PROJECTS, REPOSITORIES, USERS, ACCESS_LOG), &mut diagnostics)
        .unwrap();
    let err = plan[0].call(&registry, &mut diagnostics).unwrap_err();
    assert!(matches!(err, AnalystError::InvalidParameters { .. }));
}
