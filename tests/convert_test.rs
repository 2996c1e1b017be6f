use postman2gatling::commands::{ConvertCommandArgs, execute_convert};
use postman2gatling::config::OutputPaths;
use postman2gatling::ConvertError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn args(home: &Path) -> ConvertCommandArgs {
    ConvertCommandArgs {
        collection: PathBuf::from("tests/fixtures/collection.json"),
        environment: Some(PathBuf::from("tests/fixtures/environment.json")),
        output: None,
        paths: OutputPaths::from_home(home),
        template: None,
    }
}

#[tokio::test]
async fn convert_writes_scenario_feeder_and_bodies() {
    // 正常系: シナリオ・フィーダー・ボディファイルが Gatling のディレクトリ構成で出力されることを確認する
    let home = TempDir::new().unwrap();
    let args = args(home.path());

    execute_convert(&args).await.unwrap();

    let scenario =
        fs::read_to_string(home.path().join("user-files/simulations/Pet_Store.scala")).unwrap();
    assert!(scenario.contains("class Pet_Store extends Simulation"));
    assert!(scenario.contains("jsonFile(\"Pet_Store.json\")"));
    assert!(!scenario.contains("{{requests}}"));

    let feeder = fs::read_to_string(home.path().join("user-files/data/Pet_Store.json")).unwrap();
    assert!(feeder.ends_with('\n'));
    let feeder: serde_json::Value = serde_json::from_str(&feeder).unwrap();
    assert_eq!(
        feeder,
        serde_json::json!([{
            "host": "http://localhost:8080",
            "scheme": "http",
            "user": "admin"
        }])
    );

    let body = fs::read_to_string(
        home.path()
            .join("user-files/bodies/Pet_Store/Create_user_stringbody.txt"),
    )
    .unwrap();
    assert_eq!(body, r#"{"name": "${name}"}"#);
}

#[tokio::test]
async fn convert_renders_requests_in_folder_order() {
    // 正常系: フォルダ名順、その後ルートのリクエストの順で出力されることを確認する
    let home = TempDir::new().unwrap();
    let args = args(home.path());

    execute_convert(&args).await.unwrap();

    let scenario =
        fs::read_to_string(home.path().join("user-files/simulations/Pet_Store.scala")).unwrap();
    let positions: Vec<usize> = [
        "http(\"Upload avatar\")",
        "http(\"Create user\")",
        "http(\"Get user\")",
        "http(\"Health\")",
    ]
    .iter()
    .map(|needle| {
        scenario
            .find(needle)
            .unwrap_or_else(|| panic!("missing {needle} in:\n{scenario}"))
    })
    .collect();

    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[tokio::test]
async fn convert_renders_auth_headers_and_checks() {
    let home = TempDir::new().unwrap();
    let args = args(home.path());

    execute_convert(&args).await.unwrap();

    let scenario =
        fs::read_to_string(home.path().join("user-files/simulations/Pet_Store.scala")).unwrap();

    let create_user = [
        "    .exec(http(\"Create user\")",
        "      .post(\"${host}/users\")",
        "      .basicAuth(\"${user}\", \"secret\")",
        "      .header(\"Content-Type\", \"application/json\")",
        "      .body(RawFileBody(\"Pet_Store/Create_user_stringbody.txt\"))",
        "      .check(",
        "        status.is(201),",
        "        regex(\"name\").exists,",
        "        jsonPath(\"$.id\").saveAs(\"userId\")",
        "      )",
        "    )",
    ]
    .join("\n");
    assert!(scenario.contains(&create_user), "unexpected scenario:\n{scenario}");
    assert!(!scenario.contains("Authorization"));

    let get_user = [
        "      .get(\"${host}/users/${userId}\")",
        "      .header(\"Accept\", \"application/json\")",
        "      .check(",
        "        status.in(200, 304),",
        "        status.not(404),",
        "        jsonPath(\"$.auth.token\").saveAs(\"token\"),",
        "        status.transform(string => \"fast\").saveAs(\"mode\")",
        "      )",
    ]
    .join("\n");
    assert!(scenario.contains(&get_user), "unexpected scenario:\n{scenario}");

    assert!(scenario.contains(".body(RawFileBody(\"Pet_Store/avatar.png\"))"));
    assert!(scenario.contains(
        "    .exec(http(\"Health\")\n      .get(\"${host}/health\")\n    )\n"
    ));
}

#[tokio::test]
async fn convert_uses_output_name_and_custom_template() {
    // 正常系: --output と --template を指定した場合の出力先とテンプレート置換を確認する
    let home = TempDir::new().unwrap();
    let mut args = args(home.path());
    args.output = Some("Smoke Test".to_string());
    args.template = Some(PathBuf::from("tests/fixtures/template.scala"));

    execute_convert(&args).await.unwrap();

    let scenario =
        fs::read_to_string(home.path().join("user-files/simulations/Smoke_Test.scala")).unwrap();
    assert!(scenario.starts_with("class Smoke_Test extends Simulation {\n"));
    assert!(scenario.contains("scenario(\"Smoke_Test\")"));
    assert!(scenario.contains("RawFileBody(\"Smoke_Test/Create_user_stringbody.txt\")"));
    assert!(home.path().join("user-files/data/Smoke_Test.json").is_file());
}

#[tokio::test]
async fn convert_without_environment_writes_no_feeder() {
    let home = TempDir::new().unwrap();
    let mut args = args(home.path());
    args.environment = None;

    execute_convert(&args).await.unwrap();

    // シナリオがフィーダーを参照しないこと、フィーダーファイルも出力されないことを確認する
    let scenario =
        fs::read_to_string(home.path().join("user-files/simulations/Pet_Store.scala")).unwrap();
    assert!(!scenario.contains("jsonFile"));
    assert!(!home.path().join("user-files/data/Pet_Store.json").exists());
}

#[tokio::test]
async fn convert_scenario_feeds_only_from_written_feeder() {
    let home = TempDir::new().unwrap();
    let args = args(home.path());

    execute_convert(&args).await.unwrap();

    let scenario =
        fs::read_to_string(home.path().join("user-files/simulations/Pet_Store.scala")).unwrap();
    assert!(scenario.contains("    .feed(jsonFile(\"Pet_Store.json\").circular)\n"));
    assert!(home.path().join("user-files/data/Pet_Store.json").is_file());
}

#[tokio::test]
async fn convert_returns_error_for_missing_collection() {
    // 異常系: 存在しないコレクションを指定した場合に読み込みエラーになることを確認する
    let home = TempDir::new().unwrap();
    let mut args = args(home.path());
    args.collection = PathBuf::from("tests/fixtures/does-not-exist.json");

    let result = execute_convert(&args).await;

    assert!(matches!(result, Err(ConvertError::CollectionLoadError(_))));
    let message = format!("{}", result.unwrap_err());
    assert!(
        message.contains("does-not-exist.json"),
        "unexpected message: {message}"
    );
    assert!(!home.path().join("user-files/simulations").exists());
}

#[tokio::test]
async fn convert_returns_error_for_missing_template() {
    // 異常系: 存在しないテンプレートを指定した場合にエラーになることを確認する
    let home = TempDir::new().unwrap();
    let mut args = args(home.path());
    args.template = Some(PathBuf::from("tests/fixtures/missing.scala"));

    let result = execute_convert(&args).await;

    assert!(matches!(result, Err(ConvertError::TemplateLoadError(_))));
}
