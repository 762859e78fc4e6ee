use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use crate::runner::FailedTest;

/// 邮件标题
pub fn subject<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "Web watchdog error report from {}",
        now.format("%Y-%m-%d %H:%M:%S")
    )
}

/// 纯文本邮件正文，逐条列出失败的测试及其错误
pub fn format_report(failed: &[FailedTest]) -> String {
    let mut text = String::from("Web-watchdog reports following failed tests:\n");

    for (i, test) in failed.iter().enumerate() {
        text.push_str(&format!("\n{}) {}:\n", i + 1, test.title));
        for error in &test.errors {
            text.push_str(&format!("\t{}\n", error));
        }
    }

    text.push_str("\n\nYour web-watchdog");
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_report() {
        let failed = vec![
            FailedTest {
                title: "Front page".to_string(),
                errors: vec![
                    "Loading time limit exceeded by 104.0%.".to_string(),
                    "HTTP status code 404".to_string(),
                ],
            },
            FailedTest {
                title: "Search".to_string(),
                errors: vec!["Missing URL parameter 'q'".to_string()],
            },
        ];

        let text = format_report(&failed);
        assert!(text.starts_with("Web-watchdog reports following failed tests:\n"));
        assert!(text.contains("\n1) Front page:\n\tLoading time limit exceeded by 104.0%.\n\tHTTP status code 404\n"));
        assert!(text.contains("\n2) Search:\n\tMissing URL parameter 'q'\n"));
        assert!(text.ends_with("Your web-watchdog"));
    }

    #[test]
    fn test_subject() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            subject(&now),
            "Web watchdog error report from 2024-03-09 07:05:01"
        );
    }
}
