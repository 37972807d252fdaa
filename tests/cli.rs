use assert_cmd::Command;
use std::io::Write;
use tempfile::NamedTempFile;

const DB: &str = "\
\"134744064\",\"134744319\",\"US\",\"United States of America\"
\"1920434176\",\"1920450559\",\"SG\",\"Singapore\"
";

const PETALBOT: &str = r#"tales.mbivert.com 127.0.0.1 - - [23/Jul/2022:09:34:25 +0200] "GET /fr/?x=1 HTTP/1.1" 200 13105 "https://tales.mbivert.com/fr/" "PetalBot" 114.119.136.109 -"#;
const REDIRECT: &str = r#"http-to-https 8.8.8.8 - - [03/Jul/2022:01:53:00 +0200] "GET / HTTP/1.1" 301 0 "" "Mozilla/5.0" - -"#;
const UNKNOWN: &str = r#"http-to-https 167.94.138.62 - - [24/Jul/2022:00:10:00 +0000] "<UNKNOWN> " 400 0 "" "" - -"#;
const TURNOVER: &str = "2022-07-24T00:00:01.123Z gw newsyslog[4242]: logfile turned over";

fn fixture(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write fixture");
    file.flush().expect("flush fixture");
    file
}

struct Output {
    stdout: String,
    stderr: String,
    success: bool,
}

/// Run one of the binaries of this package with `input` on stdin.
fn run(bin: &str, input: &str, args: &[&str]) -> Output {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin(bin).unwrap();
    let output = cmd
        .env_remove("RUST_LOG")
        .env_remove("IPLOC_DB")
        .args(args)
        .write_stdin(input)
        .output()
        .expect("failed to execute");

    Output {
        stdout: String::from_utf8(output.stdout).expect("utf-8 stdout"),
        stderr: String::from_utf8(output.stderr).expect("utf-8 stderr"),
        success: output.status.success(),
    }
}

fn logtweak(db: &NamedTempFile, input: &str, args: &[&str]) -> Output {
    let db = db.path().to_str().expect("utf-8 temp path");
    let mut all = vec!["--ipdb", db, "--ofs", "|"];
    all.extend_from_slice(args);
    run("logtweak", input, &all)
}

#[test]
fn httpd_fw_record() {
    let db = fixture(DB);
    let out = logtweak(&db, PETALBOT, &["--openbsd-httpd-fw"]);
    assert!(out.success, "{}", out.stderr);
    assert_eq!(
        out.stdout,
        "tales.mbivert.com|23/Jul/2022:09:34:25 +0200|1658561665|GET|/fr/|200|HTTP/1.1|Singapore|114.119.136.109|?x=1|PetalBot\n"
    );
}

#[test]
fn httpd_fw_records_keep_input_order() {
    let db = fixture(DB);
    let input = [PETALBOT, REDIRECT, UNKNOWN].join("\n");
    let out = logtweak(&db, &input, &["--openbsd-httpd-fw"]);
    assert!(out.success, "{}", out.stderr);

    let lines: Vec<&str> = out.stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("tales.mbivert.com|"));
    assert_eq!(
        lines[1],
        "http-to-https|03/Jul/2022:01:53:00 +0200|1656805980|GET|/|301|HTTP/1.1|United States of America|8.8.8.8||Mozilla/5.0"
    );
    // Outside of every range
    assert_eq!(
        lines[2],
        "http-to-https|24/Jul/2022:00:10:00 +0000|1658621400|<UNKNOWN>||400||Unknown|167.94.138.62||"
    );
}

#[test]
fn window_is_inclusive_per_day() {
    let db = fixture(DB);
    let input = [PETALBOT, REDIRECT, UNKNOWN].join("\n");
    let out = logtweak(
        &db,
        &input,
        &["--openbsd-httpd-fw", "--begin", "2022-07-23", "--end", "2022-07-23"],
    );
    assert!(out.success, "{}", out.stderr);
    assert_eq!(out.stdout.lines().count(), 1);
    assert!(out.stdout.contains("|PetalBot"));
}

#[test]
fn newsyslog_lines_are_dropped_silently() {
    let db = fixture(DB);
    let input = format!("{TURNOVER}\n{PETALBOT}\n");
    let out = logtweak(&db, &input, &["--openbsd-httpd-fw"]);
    assert!(out.success);
    assert_eq!(out.stdout.lines().count(), 1);
    assert_eq!(out.stderr, "");
}

#[test]
fn extra_skip_pattern() {
    let db = fixture(DB);
    let input = format!("{PETALBOT}\n{REDIRECT}\n");
    let out = logtweak(&db, &input, &["--openbsd-httpd-fw", "--skip", "^http-to-https "]);
    assert!(out.success);
    assert_eq!(out.stdout.lines().count(), 1);
    assert!(out.stdout.starts_with("tales.mbivert.com|"));
}

#[test]
fn unmatched_line_is_logged_and_dropped() {
    let db = fixture(DB);
    let input = format!("{PETALBOT}\nnot an access log line\n{REDIRECT}\n");
    let out = logtweak(&db, &input, &["--openbsd-httpd-fw"]);
    assert!(out.success);
    assert_eq!(out.stdout.lines().count(), 2);
    assert!(out.stderr.contains("WARN"), "{}", out.stderr);
    assert!(out.stderr.contains("line=2"), "{}", out.stderr);
    assert!(out.stderr.contains("regexp failed on line"), "{}", out.stderr);
}

#[test]
fn bad_address_is_logged_and_dropped() {
    let db = fixture(DB);
    let line = PETALBOT.replace("127.0.0.1", "10.0.0.256");
    let out = logtweak(&db, &line, &["--openbsd-httpd-fw"]);
    assert!(out.success);
    assert_eq!(out.stdout, "");
    assert!(out.stderr.contains("'10.0.0.256' is not an IPv4"), "{}", out.stderr);
}

#[test]
fn split_mode_with_custom_columns() {
    let db = fixture(DB);
    let cols = "agent,ip,fw-ip,domain,date,method,path,values,version,status";
    let input = "curl,-,8.8.8.8,example.org,23/Jul/2022:09:34:25 +0200,GET,/,,HTTP/1.1,200\n";
    let out = logtweak(&db, input, &["--ifs", ",", "--cols", cols]);
    assert!(out.success, "{}", out.stderr);
    assert_eq!(
        out.stdout,
        "example.org|23/Jul/2022:09:34:25 +0200|1658561665|GET|/|200|HTTP/1.1|United States of America|8.8.8.8||curl\n"
    );
}

#[test]
fn custom_input_regexp() {
    let db = fixture(DB);
    let cols = "domain,ip,date,method,path,status,version,fw-ip,values,agent";
    let ire = r"^(\S+) (\S+) \[([^\]]+)\] (\S+) (\S+) (\d+)()()()()$";
    let input = "example.org 8.8.4.4 [23/Jul/2022:09:34:25 +0200] GET /a 404\n";
    let out = logtweak(&db, input, &["--ire", ire, "--cols", cols]);
    assert!(out.success, "{}", out.stderr);
    assert_eq!(
        out.stdout,
        "example.org|23/Jul/2022:09:34:25 +0200|1658561665|GET|/a|404||Unknown|8.8.4.4||\n"
    );
}

#[test]
fn short_record_is_a_schema_error() {
    let db = fixture(DB);
    let cols = "domain,date,method,path,status,version,ip,fw-ip,values,agent";
    let input = "example.org,23/Jul/2022:09:34:25 +0200,GET\n";
    let out = logtweak(&db, input, &["--ifs", ",", "--cols", cols]);
    assert!(out.success);
    assert_eq!(out.stdout, "");
    assert!(out.stderr.contains("ERROR"), "{}", out.stderr);
    assert!(out.stderr.contains("not enough fields"), "{}", out.stderr);
}

#[test]
fn files_are_read_in_order() {
    let db = fixture(DB);
    let first = fixture(&format!("{REDIRECT}\n"));
    let second = fixture(&format!("{PETALBOT}\n"));
    let out = logtweak(
        &db,
        "",
        &[
            "--openbsd-httpd-fw",
            second.path().to_str().unwrap(),
            first.path().to_str().unwrap(),
        ],
    );
    assert!(out.success, "{}", out.stderr);
    let lines: Vec<&str> = out.stdout.lines().collect();
    assert!(lines[0].starts_with("tales.mbivert.com|"));
    assert!(lines[1].starts_with("http-to-https|"));
}

#[test]
fn bad_begin_date_is_fatal() {
    let db = fixture(DB);
    let out = logtweak(&db, PETALBOT, &["--openbsd-httpd-fw", "--begin", "23/07/2022"]);
    assert!(!out.success);
    assert!(out.stderr.starts_with("error: --begin"), "{}", out.stderr);
}

#[test]
fn missing_database_is_fatal() {
    let out = run(
        "logtweak",
        PETALBOT,
        &["--ipdb", "/nonexistent/ip2location.csv", "--openbsd-httpd-fw"],
    );
    assert!(!out.success);
    assert!(
        out.stderr.contains("cannot load IP location database"),
        "{}",
        out.stderr
    );
}

#[test]
fn missing_required_column_is_fatal() {
    let db = fixture(DB);
    let out = logtweak(&db, "", &["--cols", "domain,date"]);
    assert!(!out.success);
    assert!(out.stderr.contains("schema lacks required column"), "{}", out.stderr);
}

const RULES: &str = r#"[
    {"exprs": {"path": "^/wp-"}, "tags": ["scan", "wordpress"]},
    {"exprs": {"agent": "(?i)bot"}, "tags": ["bot"], "continue": true},
    {"exprs": {"country": "^Singapore$"}, "tags": ["sg"]},
    {"tags": ["other"]}
]"#;

fn logtag(rules: &NamedTempFile, input: &str, args: &[&str]) -> Output {
    let rules = rules.path().to_str().expect("utf-8 temp path");
    let mut all = vec!["--rules", rules, "--ifs", "|", "--ofs", "|"];
    all.extend_from_slice(args);
    run("logtag", input, &all)
}

#[test]
fn tags_logtweak_output() {
    let rules = fixture(RULES);
    let input = "\
tales.mbivert.com|23/Jul/2022:09:34:25 +0200|1658561665|GET|/fr/|200|HTTP/1.1|Singapore|114.119.136.109|?x=1|PetalBot
example.org|23/Jul/2022:09:34:25 +0200|1658561665|GET|/wp-login.php|404|HTTP/1.1|Unknown|9.9.9.9||curl
example.org|23/Jul/2022:09:34:25 +0200|1658561665|GET|/|200|HTTP/1.1|Unknown|9.9.9.9||curl
";
    let out = logtag(&rules, input, &["--openbsd-httpd-fw"]);
    assert!(out.success, "{}", out.stderr);
    let tags: Vec<&str> = out
        .stdout
        .lines()
        .map(|line| line.rsplit('|').next().unwrap())
        .collect();
    assert_eq!(tags, ["bot,sg", "scan,wordpress", "other"]);
}

#[test]
fn tag_separator_and_columns() {
    let rules = fixture(r#"[{"exprs": {"b": "x"}, "tags": ["one", "two"]}]"#);
    let out = logtag(&rules, "1|x\n2|y\n", &["--cols", "a,b", "--ts", ";"]);
    assert!(out.success, "{}", out.stderr);
    assert_eq!(out.stdout, "1|x|one;two\n2|y|\n");
}

#[test]
fn tag_schema_error_drops_line() {
    let rules = fixture(r#"[{"exprs": {"b": "x"}, "tags": ["hit"]}]"#);
    let out = logtag(&rules, "1|x\nshort\n3|x\n", &["--cols", "a,b"]);
    assert!(out.success);
    assert_eq!(out.stdout, "1|x|hit\n3|x|hit\n");
    assert!(out.stderr.contains("line=2"), "{}", out.stderr);
    assert!(out.stderr.contains("not enough fields to reach 'b'"), "{}", out.stderr);
}

#[test]
fn bad_rule_file_is_fatal() {
    let rules = fixture(r#"[{"exprs": {"b": "("}}]"#);
    let out = logtag(&rules, "1|x\n", &["--cols", "a,b"]);
    assert!(!out.success);
    assert!(out.stderr.starts_with("error: cannot load rules from"), "{}", out.stderr);
}

#[test]
fn no_rule_file_leaves_tags_empty() {
    let out = run("logtag", "1|x\n2|y\n", &["--ifs", "|", "--ofs", "|", "--cols", "a,b"]);
    assert!(out.success, "{}", out.stderr);
    assert_eq!(out.stdout, "1|x|\n2|y|\n");
}
