//! Login and registration flows.
//!
//! Passwords are stored and compared as plain text, verbatim. The flows
//! here only prompt, validate and render; account state changes go
//! through [`shopfront_db::CustomerRepository`].

use anyhow::Result;

use shopfront_core::{validation, User};
use shopfront_db::{Database, StoreError};

use crate::prompt;

/// Asks for credentials and returns the account on success.
pub async fn login(db: &Database) -> Result<Option<User>> {
    let id: i64 = prompt::prompt_parse("\nPlease enter your user id: ")?;

    let Some(user) = db.customers().find_user(id).await? else {
        println!("\n[x] No such user. Please register first.");
        return Ok(None);
    };

    let password = prompt::prompt_nonempty("Please enter your password: ")?;
    if password != user.password {
        println!("\n[x] Password is not correct.");
        return Ok(None);
    }

    println!("\nWelcome back, {}!", user.name);
    Ok(Some(user))
}

/// Walks through registration and returns the new account on success.
pub async fn register(db: &Database) -> Result<Option<User>> {
    let name = loop {
        let name = prompt::prompt("\nPlease enter your name: ")?;
        match validation::validate_name(&name) {
            Ok(()) => break name,
            Err(err) => println!("[x] {err}"),
        }
    };

    let email = loop {
        let email = prompt::prompt("Please enter your email address: ")?;
        match validation::validate_email(&email) {
            Ok(()) => break email.to_lowercase(),
            Err(err) => println!("[x] {err}"),
        }
    };

    let password = loop {
        let password = prompt::prompt("Please enter a password: ")?;
        match validation::validate_password(&password) {
            Ok(()) => break password,
            Err(err) => println!("[x] {err}"),
        }
    };

    if db.customers().email_exists(&email).await? {
        println!("\n[x] This email address is already registered.");
        return Ok(None);
    }

    let user = match db.customers().register(&name, &email, &password).await {
        Ok(user) => user,
        // The pre-check above races nothing in a single terminal, but the
        // store still enforces uniqueness; render it the same way.
        Err(StoreError::UniqueViolation { .. }) => {
            println!("\n[x] This email address is already registered.");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    println!("\n[✓] Signed up successfully!");
    println!("Your user id is {}. You will log in with it.", user.id);
    Ok(Some(user))
}
