use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const DOCUMENTS: [(&str, &str); 4] = [
    ("skills", "SKILLS"),
    ("series", "SERIES"),
    ("values", "VALUES"),
    ("analysis", "ANALYSIS"),
];

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../skillgrowth-core/tests/fixtures")
}

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "skill-report-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_skill-report"))
        .args(args)
        .env_remove("SKILL_REPORT_DATA_BASE")
        .output()
        .expect("run cli")
}

fn run_json(args: &[&str]) -> serde_json::Value {
    let output = run(args);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json report")
}

fn fixtures_arg() -> String {
    fixtures().display().to_string()
}

/// Serve the fixture directory over HTTP on an ephemeral port.
fn serve_fixtures() -> SocketAddr {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("runtime");
        runtime.block_on(async move {
            let make_service = make_service_fn(|_conn| async {
                Ok::<_, Infallible>(service_fn(|req: Request<Body>| async move {
                    let name = req.uri().path().trim_start_matches('/').to_string();
                    let response = match std::fs::read(fixtures().join(&name)) {
                        Ok(bytes) => Response::new(Body::from(bytes)),
                        Err(_) => Response::builder()
                            .status(StatusCode::NOT_FOUND)
                            .body(Body::empty())
                            .expect("not found response"),
                    };
                    Ok::<_, Infallible>(response)
                }))
            });
            let server =
                Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_service);
            tx.send(server.local_addr()).expect("send address");
            server.await.expect("fixture server");
        });
    });
    rx.recv().expect("server address")
}

#[test]
fn skills_report_from_directory() {
    let base = fixtures_arg();
    let report = run_json(&["--data-base", &base, "--report", "json"]);
    assert_eq!(report["view"], "skills");
    let rows = report["rows"].as_array().expect("rows");
    let ids: Vec<&str> = rows.iter().filter_map(|r| r["id"].as_str()).collect();
    assert_eq!(ids, vec!["10023", "10024", "10025"]);
    assert_eq!(rows[0]["consume_range"]["min"], 19.0);
    assert_eq!(rows[0]["deal_range"]["min"], 300.0);
    assert_eq!(rows[1]["consume_range"]["max"], 0.0);
    assert_eq!(rows[2]["deal_range"]["max"], 6.0);
    assert_eq!(rows[0]["effects_text"], "灼烧；招式到达三重后附加精神打击");
}

#[test]
fn query_and_expand_select_details() {
    let base = fixtures_arg();
    let report = run_json(&[
        "--data-base",
        &base,
        "--report",
        "json",
        "--query",
        "烈焰-掌",
        "--expand",
        "10023",
    ]);
    assert_eq!(report["rows"].as_array().map(Vec::len), Some(1));
    let deal = &report["details"]["10023"]["deal"];
    assert_eq!(deal[1]["label"], "灼烧伤害");
    assert_eq!(deal[1]["rows"][9]["is_jump"], true);
}

#[test]
fn series_view_csv_sorted_by_jumps() {
    let base = fixtures_arg();
    let output_path = temp_path("series.csv");
    let output = run(&[
        "--data-base",
        &base,
        "--view",
        "series",
        "--sort",
        "jumps",
        "--report",
        "csv",
        "--output",
        output_path.to_str().expect("utf-8 path"),
    ]);
    assert!(output.status.success());
    let content = std::fs::read_to_string(&output_path).expect("read output");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "series_id,skill_id,skill_name,label,min,max,is_linear,trend,jumps");
    assert_eq!(lines.len(), 9);
    assert!(lines[1].starts_with("10023:灼烧伤害,"));
    assert!(lines[2].starts_with("10024:恢复-气血,"));
}

#[test]
fn chart_view_markdown() {
    let base = fixtures_arg();
    let output = run(&[
        "--data-base",
        &base,
        "--view",
        "chart",
        "--query",
        "10024",
        "--report",
        "markdown",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Skill Growth Report"));
    assert!(stdout.contains("| 寒冰 诀 恢复-气血 | 5 (3 - 12) | 5 |"));
}

#[test]
fn falls_back_to_preload_scripts() {
    let preload = temp_path("preload");
    std::fs::create_dir_all(&preload).expect("create preload dir");
    for (stem, global) in DOCUMENTS {
        let json = std::fs::read_to_string(fixtures().join(format!("{stem}.json")))
            .expect("read fixture");
        std::fs::write(
            preload.join(format!("{stem}.js")),
            format!("window.{global} = {json};\n"),
        )
        .expect("write script");
    }
    let missing = preload.join("missing");
    let report = run_json(&[
        "--data-base",
        missing.to_str().expect("utf-8 path"),
        "--fallback-dir",
        preload.to_str().expect("utf-8 path"),
        "--report",
        "json",
        "--query",
        "10025",
    ]);
    assert_eq!(report["rows"][0]["name"], "疾风步");
    assert_eq!(report["rows"][0]["consume_range"]["min"], 5.0);
}

#[test]
fn missing_documents_fail_once() {
    let missing = temp_path("nothing");
    let output = run(&["--data-base", missing.to_str().expect("utf-8 path")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("load failed").count(), 1, "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn loads_documents_over_http() {
    let addr = serve_fixtures();
    let base = format!("http://{addr}/");
    let report = run_json(&["--data-base", &base, "--report", "json", "--view", "series"]);
    assert_eq!(report["view"], "series");
    assert_eq!(report["rows"].as_array().map(Vec::len), Some(8));
    assert_eq!(report["rows"][0]["series_id"], "10023:消耗-内力");
}

#[test]
fn data_base_comes_from_the_environment() {
    let output = Command::new(env!("CARGO_BIN_EXE_skill-report"))
        .args(["--report", "csv"])
        .env("SKILL_REPORT_DATA_BASE", fixtures())
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("id,name,description,effects,"));
    assert!(stdout.contains("10025,疾风步,,,5,6,2,6"));
}
