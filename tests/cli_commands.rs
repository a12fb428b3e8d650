use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

mod util;
use util::TempFixtureDir;

/// `bikeshare` with an isolated config home and the fixture data directory.
fn bikeshare(fixture: &TempFixtureDir, config_home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("bikeshare");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("BIKESHARE_DATA_DIR")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(fixture.path());
    cmd
}

fn stdout_json(cmd: &mut assert_cmd::Command) -> Value {
    let out = cmd.assert().success().get_output().clone();
    serde_json::from_slice(&out.stdout).expect("valid json")
}

#[test]
fn stats_json_for_unfiltered_chicago() {
    let fixture = TempFixtureDir::with_default_cities();
    let home = TempDir::new().unwrap();
    let json = stdout_json(bikeshare(&fixture, &home).args(["stats", "--city", "chicago", "--json"]));

    let time = &json["report"]["time"];
    assert_eq!(time["popular_day"]["value"], "Monday");
    assert_eq!(time["popular_day"]["count"], 6);
    assert_eq!(time["popular_month"]["value"], 3);
    assert_eq!(time["popular_month_name"], "March");
    assert_eq!(time["popular_hour"]["value"], 8);
    assert_eq!(json["report"]["station"]["popular_start_station"]["value"], "Canal St & Adams St");
    assert_eq!(json["_meta"]["city"], "chicago");
    assert_eq!(json["_meta"]["trips"], 10);
    assert!(
        json["_meta"]["timings"].as_array().is_some_and(|t| !t.is_empty()),
        "expected per-statistic timings, got: {json}"
    );
}

#[test]
fn stats_json_with_month_filter_omits_popular_month() {
    let fixture = TempFixtureDir::with_default_cities();
    let home = TempDir::new().unwrap();
    let json = stdout_json(bikeshare(&fixture, &home).args([
        "stats", "--city", "Chicago", "--filter", "month", "--month", "march", "--json",
    ]));

    assert_eq!(json["_meta"]["trips"], 6);
    assert_eq!(json["_meta"]["source_rows"], 10);
    assert!(json["report"]["time"]["popular_month"].is_null());
    assert_eq!(json["report"]["time"]["popular_day"]["value"], "Monday");
}

#[test]
fn stats_text_output() {
    let fixture = TempFixtureDir::with_default_cities();
    let home = TempDir::new().unwrap();
    bikeshare(&fixture, &home)
        .args(["stats", "--city", "washington"])
        .assert()
        .success()
        .stdout(contains("Showing Washington data"))
        .stdout(contains("Most popular start station: 14th & V St NW"))
        .stdout(contains("Execution time"));
}

#[test]
fn invalid_city_exits_with_validation_code() {
    let fixture = TempFixtureDir::with_default_cities();
    let home = TempDir::new().unwrap();
    let out = bikeshare(&fixture, &home)
        .args(["stats", "--city", "boston", "--json"])
        .assert()
        .code(2)
        .get_output()
        .clone();
    let err: Value = serde_json::from_slice(&out.stderr).expect("json error envelope");
    assert_eq!(err["error"]["kind"], "validation");
    assert!(err["error"]["message"].as_str().unwrap().contains("boston"));
}

#[test]
fn month_mode_without_month_is_rejected() {
    let fixture = TempFixtureDir::with_default_cities();
    let home = TempDir::new().unwrap();
    bikeshare(&fixture, &home)
        .args(["stats", "--city", "chicago", "--filter", "month"])
        .assert()
        .code(2)
        .stderr(contains("month is required"));
}

#[test]
fn missing_data_file_exits_with_load_code() {
    let fixture = TempFixtureDir::with_default_cities();
    let home = TempDir::new().unwrap();
    bikeshare(&fixture, &home)
        .args(["stats", "--city", "new york"])
        .assert()
        .code(3)
        .stderr(contains("new_york_city.csv"))
        .stderr(contains("hint:"));
}

#[test]
fn empty_filter_exits_with_no_data_code() {
    let fixture = TempFixtureDir::with_default_cities();
    let home = TempDir::new().unwrap();
    bikeshare(&fixture, &home)
        .args(["stats", "--city", "chicago", "--filter", "month", "--month", "february"])
        .assert()
        .code(4)
        .stdout(contains("No trips match"));
}

#[test]
fn raw_pages_by_offset() {
    let fixture = TempFixtureDir::with_default_cities();
    let home = TempDir::new().unwrap();

    let first = stdout_json(bikeshare(&fixture, &home).args(["raw", "--city", "chicago", "--json"]));
    assert_eq!(first["total"], 10);
    assert_eq!(first["rows"].as_array().unwrap().len(), 5);
    assert_eq!(first["next_offset"], 5);

    let last = stdout_json(bikeshare(&fixture, &home).args([
        "raw", "--city", "chicago", "--offset", "5", "--json",
    ]));
    assert_eq!(last["rows"].as_array().unwrap().len(), 5);
    assert!(last["next_offset"].is_null());
    assert_eq!(last["rows"][0]["start_station"], "Canal St & Adams St");

    bikeshare(&fixture, &home)
        .args(["raw", "--city", "chicago", "--offset", "10"])
        .assert()
        .code(4);
}

#[test]
fn cities_lists_catalog() {
    let fixture = TempFixtureDir::with_default_cities();
    let home = TempDir::new().unwrap();
    let json = stdout_json(bikeshare(&fixture, &home).args(["cities", "--json"]));
    let cities = json["cities"].as_array().expect("cities array");
    assert_eq!(cities.len(), 3);
    assert_eq!(cities[0]["city"], "chicago");
    assert_eq!(cities[2]["has_demographics"], false);
}

#[test]
fn config_file_renames_a_city_source() {
    let fixture = TempFixtureDir::with_default_cities();
    fixture.write_csv("nyc_2017.csv", util::DEMOGRAPHIC_HEADER, &util::chicago_rows());
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("bikeshare");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[files]\nnew_york = \"nyc_2017.csv\"\n",
    )
    .unwrap();

    let json = stdout_json(bikeshare(&fixture, &home).args(["stats", "--city", "newyork", "--json"]));
    assert_eq!(json["_meta"]["city"], "new_york");
    assert_eq!(json["_meta"]["trips"], 10);
}

#[test]
fn bad_config_exits_with_config_code() {
    let fixture = TempFixtureDir::with_default_cities();
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("bikeshare");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[files]\nboston = \"b.csv\"\n").unwrap();

    bikeshare(&fixture, &home)
        .args(["cities"])
        .assert()
        .code(5);
}

#[test]
fn config_file_name_outside_data_dir_is_rejected() {
    let fixture = TempFixtureDir::with_default_cities();
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("bikeshare");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "[files]\nchicago = \"/etc/passwd\"\n",
    )
    .unwrap();

    bikeshare(&fixture, &home)
        .args(["stats", "--city", "chicago"])
        .assert()
        .code(5)
        .stderr(contains("path separators"));
}
