use std::fs::OpenOptions;
use std::io::Write;

use crate::utils::now_millis;

// build the line once, mirror it to stdout and the log file
fn write_line(level: &str, msg: &str) {
    let line = format!("[{}] {}: {}\n", now_millis(), level, msg);
    print!("{line}");
    // ignore write errors so a full disk can never take the server down
    if let Ok(mut f) = OpenOptions::new()
        .create(true)
        .append(true)
        .open("server.log")
    {
        let _ = f.write_all(line.as_bytes());
    }
}

pub fn info(msg: &str) {
    write_line("INFO", msg);
}

pub fn warn(msg: &str) {
    write_line("WARN", msg);
}

pub fn error(msg: &str) {
    write_line("ERROR", msg);
}
