use std::env;

const HELP: &str = include_str!("./cli-help.txt");

/// Every variable the server reads, with the value used when it is unset. None of them are secret.
const SETTINGS: [(&str, &str); 13] = [
    ("RUST_LOG", "error"),
    ("LPS_HOST", "127.0.0.1"),
    ("LPS_PORT", "8081"),
    ("LPS_DATABASE_URL", "sqlite://data/loyalty_store.db"),
    ("LPS_ACCRUAL_SYSTEM_ADDRESS", "http://127.0.0.1:8080"),
    ("LPS_ACCRUAL_TIMEOUT_MS", "1000"),
    ("LPS_WORKER_COUNT", "1"),
    ("LPS_DEFAULT_RETRY_AFTER", "15"),
    ("LPS_MAX_RETRY_AFTER", "3600"),
    ("LPS_UNAVAILABLE_BACKOFF_MS", "1000"),
    ("LPS_RESTART_DELAY_MS", "100"),
    ("LPS_CREDIT_ON_SETTLEMENT", "false"),
    ("LPS_SESSION_COOKIE", "user_identification"),
];

/// The server takes no arguments. If it is given any, it prints the help and the effective settings instead of
/// starting. Returns true in that case.
pub fn handle_command_line_args() -> bool {
    if env::args().len() <= 1 {
        return false;
    }
    println!("\n{HELP}");
    println!("Current settings:");
    for line in settings_report() {
        println!("{line}");
    }
    true
}

fn settings_report() -> Vec<String> {
    SETTINGS
        .iter()
        .map(|&(name, default)| {
            let value = match env::var_os(name) {
                Some(v) => v.to_string_lossy().into_owned(),
                None => format!("{default} (default)"),
            };
            format!("  {name:<30} {value}")
        })
        .collect()
}
