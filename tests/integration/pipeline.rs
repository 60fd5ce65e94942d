//! Full report runs into a temporary directory

use std::fs;
use std::path::Path;
use harbor_analyst::app;
use harbor_analyst::config::AnalystConfig;
use harbor_analyst::registry::parse_timestamp;
use tempfile::TempDir;

fn write_exports(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("project.csv"),
        "project_id,owner_id,name,deleted,public\n1,1,library,f,t\n2,1,team,f,f\n",
    )
    .unwrap();
    fs::write(
        dir.join("repository.csv"),
        "repository_id,name,project_id,owner_id\n10,library/nginx,1,1\n11,team/api,2,2\n12,team/scratch,2,2\n",
    )
    .unwrap();
    fs::write(dir.join("user.csv"), "user_id,username\n1,admin\n2,alice\n3,ci-bot\n").unwrap();
    fs::write(
        dir.join("access_log.csv"),
        "\
log_id,user_id,project_id,repo_name,repo_tag,operation,op_time
1,1,1,library/nginx,N/A,create,2024-02-20 10:00:00
2,2,2,team/api,v1,push,2024-02-28 08:15:00
3,3,2,team/api,v2,push,2024-02-29 08:45:00
4,3,2,team/scratch,dev,push,2024-02-29 13:00:00
5,2,1,library/nginx,1.25,pull,2024-02-29 14:00:00
6,3,1,library/nginx,1.25,push,2024-02-29 23:10:00
7,2,2,team/old,v1,push,2024-02-29 09:00:00
8,1,2,team/api,v1,delete,2024-02-29 09:30:00
9,2,2,team/api,v1,push,2023-12-01 09:00:00
",
    )
    .unwrap();
}

fn config(root: &Path) -> AnalystConfig {
    let yaml = format!(
        r#"
report:
  title: Registry activity
  description: Pushes over the last week
input:
  directory: {input}
output:
  directory: {output}
  chart-width: 600
  chart-height: 300
charts:
  - statsMethodName: PushesByHourOfDay
    titleTemplate: "Pushes per hour since {{{{ startDate }}}}"
    timePeriodInDays: 7
  - statsMethodName: TopPushedRepositories
    titleTemplate: "Top repositories"
    timePeriodInDays: 7
    maxElements: 10
    ignoreRepositoryNames: [team/scratch]
  - statsMethodName: TopPushingUsers
    titleTemplate: "Top users"
    timePeriodInDays: 7
    maxElements: 2
"#,
        input = root.join("raw").display(),
        output = root.join("out").display(),
    );
    AnalystConfig::parse(&yaml).unwrap()
}

#[test]
fn test_full_run_writes_charts_and_report() {
    let root = TempDir::new().unwrap();
    write_exports(&root.path().join("raw"));
    let config = config(root.path());
    let now = parse_timestamp("2024-03-01 12:00:00").unwrap();

    let summary = app::run_report(&config, now).unwrap();

    assert_eq!(summary.report_path, root.path().join("out").join("report.pdf"));
    let pdf = fs::read(&summary.report_path).unwrap();
    assert!(pdf.starts_with(b"%PDF"));

    assert_eq!(summary.charts.len(), 3);
    for (index, chart) in summary.charts.iter().enumerate() {
        assert_eq!(
            chart.image_path,
            root.path().join("out").join(format!("chart_{}.png", index))
        );
        assert!(chart.image_path.exists());
    }

    // one unknown repository, one delete
    assert_eq!(summary.warnings, 2);
}

#[test]
fn test_full_run_chart_values() {
    let root = TempDir::new().unwrap();
    write_exports(&root.path().join("raw"));
    let config = config(root.path());
    let now = parse_timestamp("2024-03-01 12:00:00").unwrap();

    let summary = app::run_report(&config, now).unwrap();

    let hours: Vec<(&str, u64)> = summary.charts[0]
        .values
        .iter()
        .map(|v| (v.label.as_str(), v.value))
        .collect();
    assert_eq!(hours, vec![("8:00", 2), ("13:00", 1), ("23:00", 1)]);
    assert_eq!(summary.charts[0].title, "Pushes per hour since 2024-02-23");

    let repositories: Vec<(&str, u64)> = summary.charts[1]
        .values
        .iter()
        .map(|v| (v.label.as_str(), v.value))
        .collect();
    assert_eq!(repositories, vec![("team/api", 2), ("library/nginx", 1)]);

    let users: Vec<(&str, u64)> = summary.charts[2]
        .values
        .iter()
        .map(|v| (v.label.as_str(), v.value))
        .collect();
    assert_eq!(users, vec![("ci-bot", 3), ("alice", 1)]);
}

#[test]
fn test_missing_export_aborts_before_output() {
    let root = TempDir::new().unwrap();
    write_exports(&root.path().join("raw"));
    fs::remove_file(root.path().join("raw").join("user.csv")).unwrap();
    let config = config(root.path());
    let now = parse_timestamp("2024-03-01 12:00:00").unwrap();

    let err = app::run_report(&config, now).unwrap_err();

    assert!(err.to_string().contains("user.csv"));
    assert!(!root.path().join("out").join("report.pdf").exists());
}

#[test]
fn test_empty_period_still_produces_report() {
    let root = TempDir::new().unwrap();
    write_exports(&root.path().join("raw"));
    let config = config(root.path());
    let now = parse_timestamp("2030-01-01 00:00:00").unwrap();

    let summary = app::run_report(&config, now).unwrap();

    assert!(summary.charts[0].values.is_empty());
    assert!(summary.charts[2].values.is_empty());
    // repositories are listed even without pushes in the period
    assert_eq!(summary.charts[1].values.len(), 2);
    assert!(summary.charts[1].values.iter().all(|v| v.value == 0));
    assert!(summary.report_path.exists());
}

#[test]
fn test_failing_statistic_leaves_no_output() {
    let root = TempDir::new().unwrap();
    write_exports(&root.path().join("raw"));
    let mut config = config(root.path());
    let failing: serde_yaml::Mapping = serde_yaml::from_str(
        "statsMethodName: TopPushingUsers\ntitleTemplate: Top users\ntimePeriodInDays: 7\nmaxElements: 0\n",
    )
    .unwrap();
    config.charts.push(failing);
    let now = parse_timestamp("2024-03-01 12:00:00").unwrap();

    let err = app::run_report(&config, now).unwrap_err();

    assert!(err.to_string().contains("TopPushingUsers"));
    let out = root.path().join("out");
    let leftovers: Vec<_> = fs::read_dir(&out)
        .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.file_name()).collect())
        .unwrap_or_default();
    assert!(leftovers.is_empty(), "unexpected output: {:?}", leftovers);
}
