//! Built-in demonstration, run when no command is given.

use piiguard_credentials::{hash_password, is_valid};
use piiguard_redaction::{compose_line, RedactionConfig, Redactor, USER_DATA_TARGET};
use tracing::info;

/// Made-up user records, shaped like rows of a `users` table.
const SAMPLE_USERS: &[&[(&str, &str)]] = &[
    &[
        ("name", "Marlene Wood"),
        ("email", "mwood@example.com"),
        ("phone", "(473) 401-4253"),
        ("ssn", "261-72-6780"),
        ("password", "K5?BMNv"),
        ("ip", "60ed:c396:2ff:244:bbd0:9208:26f2:93ea"),
        ("last_login", "2019-11-14 06:14:24"),
        ("user_agent", "curl/7.68.0"),
    ],
    &[
        ("name", "Bob"),
        ("email", "bob@example.com"),
        ("phone", "555-0100"),
        ("ssn", "078-05-1120"),
        ("password", "hunter2"),
        ("ip", "10.0.0.1"),
        ("last_login", "2019-11-15 08:01:02"),
        ("user_agent", "Wget/1.21"),
    ],
];

const SAMPLE_PASSWORD: &str = "MyAmazingPassw0rd";

pub fn run(config: &RedactionConfig) -> anyhow::Result<()> {
    let redactor = Redactor::with_config(config.clone());

    println!("== Redaction ==");
    for user in SAMPLE_USERS {
        let line = compose_line(*user, &config.separator, &config.kv_separator);
        info!(target: USER_DATA_TARGET, "{}", line);
        println!("{}", redactor.redact(&line).content);
    }

    println!();
    println!("== Password hashing ==");
    let record = hash_password(SAMPLE_PASSWORD)?;
    println!("hash: {}", record);
    println!(
        "is_valid({:?}): {}",
        SAMPLE_PASSWORD,
        is_valid(&record, SAMPLE_PASSWORD)?
    );
    println!("is_valid(\"wrong\"): {}", is_valid(&record, "wrong")?);

    Ok(())
}
