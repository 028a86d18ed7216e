use super::*;
use reps::RepStatusArg;
use schedule::{parse_month, IncidentArg, VisitStatusArg};

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["fieldroute"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert!(cli.api_url.is_none());
}

#[test]
fn parses_import_with_flags() {
    let cli = Cli::try_parse_from(["fieldroute", "import", "stores.csv", "--strict", "--accept-txt"])
        .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Import {
            file,
            strict,
            accept_txt,
            json,
        }) => {
            assert_eq!(file, PathBuf::from("stores.csv"));
            assert!(strict);
            assert!(accept_txt);
            assert!(!json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn import_requires_file() {
    assert!(Cli::try_parse_from(["fieldroute", "import"]).is_err());
}

#[test]
fn parses_global_api_url_after_subcommand() {
    let cli = Cli::try_parse_from(["fieldroute", "health", "--api-url", "http://10.0.0.5:8000/api/v1"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Health)));
    assert_eq!(cli.api_url.as_deref(), Some("http://10.0.0.5:8000/api/v1"));
}

#[test]
fn optimize_collects_repeated_locations() {
    let cli = Cli::try_parse_from([
        "fieldroute",
        "optimize",
        "--location",
        "loc-1",
        "--location",
        "loc-2",
        "--max-stops",
        "20",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Optimize {
            locations,
            model,
            max_stops,
            max_distance_km,
            ..
        }) => {
            assert_eq!(locations, vec!["loc-1", "loc-2"]);
            assert_eq!(model, "auto");
            assert_eq!(max_stops, Some(20));
            assert!(max_distance_km.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn optimize_requires_a_location() {
    assert!(Cli::try_parse_from(["fieldroute", "optimize"]).is_err());
}

#[test]
fn routes_list_defaults_to_first_page() {
    let cli = Cli::try_parse_from(["fieldroute", "routes", "list"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Routes {
            command: RoutesCommands::List { skip: 0, limit: 20 }
        })
    ));
}

#[test]
fn parses_routes_show() {
    let cli = Cli::try_parse_from(["fieldroute", "routes", "show", "route-7"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Routes {
            command: RoutesCommands::Show { ref id }
        }) if id == "route-7"
    ));
}

#[test]
fn parses_benchmark_run() {
    let cli = Cli::try_parse_from([
        "fieldroute",
        "benchmark",
        "run",
        "--file",
        "bench.json",
        "--iterations",
        "5",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Benchmark {
            command: BenchmarkCommands::Run { iterations: 5, .. }
        })
    ));
}

#[test]
fn rep_status_defaults_to_active() {
    let cli = Cli::try_parse_from(["fieldroute", "reps", "create", "Anna Petrova"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Reps {
            command: RepsCommands::Create {
                status: RepStatusArg::Active,
                ..
            }
        })
    ));
}

#[test]
fn parses_schedule_set_status() {
    let cli = Cli::try_parse_from(["fieldroute", "schedule", "set-status", "visit-1", "completed"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Schedule {
            command: ScheduleCommands::SetStatus {
                status: VisitStatusArg::Completed,
                ..
            }
        })
    ));
}

#[test]
fn schedule_month_rejects_bad_month() {
    assert!(Cli::try_parse_from(["fieldroute", "schedule", "month", "2026-13"]).is_err());
    assert!(Cli::try_parse_from(["fieldroute", "schedule", "month", "2026-03"]).is_ok());
}

#[test]
fn parse_month_normalizes_padding() {
    assert_eq!(parse_month("2026-3").unwrap(), "2026-03");
    assert!(parse_month("March").is_err());
}

#[test]
fn parses_force_majeure_report() {
    let cli = Cli::try_parse_from([
        "fieldroute",
        "force-majeure",
        "report",
        "--rep",
        "rep-1",
        "--date",
        "2026-03-02",
        "--kind",
        "vehicle-breakdown",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::ForceMajeure {
            command: ForceMajeureCommands::Report { rep, date, kind, description },
        }) => {
            assert_eq!(rep, "rep-1");
            assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
            assert_eq!(kind, IncidentArg::VehicleBreakdown);
            assert!(description.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn api_url_flag_overrides_environment_config() {
    let config = resolve_config(Some("http://10.0.0.5:8000/api/v1".to_string()))
        .expect("environment config should load");
    assert_eq!(config.api_base_url, "http://10.0.0.5:8000/api/v1");
    assert_eq!(config.max_attempts, fieldroute_core::load_app_config_from_env().unwrap().max_attempts);
}

mod upload {
    use std::path::PathBuf;

    use fieldroute_client::ApiClient;
    use fieldroute_core::AppConfig;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::locations::run_upload;

    struct TempFile(PathBuf);

    impl TempFile {
        fn csv(contents: &str) -> Self {
            let path = std::env::temp_dir().join(format!("fieldroute-cli-{}.csv", uuid::Uuid::new_v4()));
            std::fs::write(&path, contents).expect("temp file should be writable");
            Self(path)
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    async fn mock_upload(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/locations/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "1 location imported",
                "locations": []
            })))
            .mount(server)
            .await;
    }

    async fn upload_requests(server: &MockServer) -> usize {
        server
            .received_requests()
            .await
            .expect("request recording is enabled")
            .len()
    }

    #[tokio::test]
    async fn invalid_file_is_never_sent() {
        let server = MockServer::start().await;
        mock_upload(&server).await;
        let file = TempFile::csv("name,lat,lon\n,55.1,37.1\n");
        let client = ApiClient::new(&server.uri(), 30).expect("client");

        let result = run_upload(&client, &AppConfig::defaults(), &file.0, false).await;

        assert!(result.is_err());
        assert_eq!(upload_requests(&server).await, 0);
    }

    #[tokio::test]
    async fn unsupported_file_is_never_sent() {
        let server = MockServer::start().await;
        mock_upload(&server).await;
        let path = std::env::temp_dir().join(format!("fieldroute-cli-{}.xlsx", uuid::Uuid::new_v4()));
        std::fs::write(&path, b"PK\x03\x04").expect("temp file should be writable");
        let client = ApiClient::new(&server.uri(), 30).expect("client");

        let result = run_upload(&client, &AppConfig::defaults(), &path, false).await;
        let _ = std::fs::remove_file(&path);

        assert!(result.is_err());
        assert_eq!(upload_requests(&server).await, 0);
    }

    #[tokio::test]
    async fn valid_file_is_sent_once_with_validated_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/locations/upload"))
            .and(body_string_contains("Store 1,55.7558,37.6173"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "message": "1 location imported",
                "locations": []
            })))
            .expect(1)
            .mount(&server)
            .await;
        let file = TempFile::csv("name,lat,lon\nStore 1,55.7558,37.6173\n");
        let client = ApiClient::new(&server.uri(), 30).expect("client");

        run_upload(&client, &AppConfig::defaults(), &file.0, false)
            .await
            .expect("valid file uploads");

        assert_eq!(upload_requests(&server).await, 1);
    }
}
