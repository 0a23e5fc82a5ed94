//! Interactive role menus over any line-oriented input/output pair.

mod render;

use std::io::{self, BufRead, Write};

use crate::{
    auth::Authenticator,
    core::{
        ledger::ParkingLedger,
        rules::{self, LedgerError},
    },
    persist::StorageError,
    types::Role,
};

const BANNER: &str = "\n==============================\n   Vehicle Parking Log System\n===============================";

/// Failure that ends an interactive session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Terminal input or output failed.
    #[error("console i/o failed: {0}")]
    Io(#[from] io::Error),
    /// The event store failed mid-action.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

enum Flow {
    Continue,
    Quit,
}

/// Menu dispatcher for attendants and supervisors.
///
/// Input ends (EOF) are treated like choosing Exit.
pub struct Console<A, R, W> {
    ledger: ParkingLedger,
    auth: A,
    input: R,
    output: W,
}

impl<A: Authenticator, R: BufRead, W: Write> Console<A, R, W> {
    /// Binds a ledger and role gate to an input/output pair.
    pub fn new(ledger: ParkingLedger, auth: A, input: R, output: W) -> Self {
        Self {
            ledger,
            auth,
            input,
            output,
        }
    }

    /// Runs the role-selection loop until Exit or end of input.
    pub fn run(&mut self) -> Result<(), SessionError> {
        loop {
            writeln!(self.output, "{BANNER}")?;
            writeln!(self.output, "Select Role:\n1. Attendant\n2. Supervisor\n3. Exit")?;
            let Some(choice) = self.prompt("Choice: ")? else {
                break;
            };
            let role = match choice.as_str() {
                "1" => Role::Attendant,
                "2" => Role::Supervisor,
                "3" => break,
                _ => {
                    writeln!(self.output, "Invalid choice. Please select 1, 2, or 3.")?;
                    continue;
                }
            };

            if let Flow::Quit = self.login(role)? {
                break;
            }
            writeln!(self.output, "Welcome to the Vehicle Parking Log System!")?;
            writeln!(self.output, "-------------------------------------")?;

            let flow = match role {
                Role::Attendant => self.attendant_menu()?,
                Role::Supervisor => self.supervisor_menu()?,
            };
            if let Flow::Quit = flow {
                break;
            }
        }
        writeln!(self.output, "Goodbye.")?;
        self.output.flush()?;
        Ok(())
    }

    fn login(&mut self, role: Role) -> Result<Flow, SessionError> {
        loop {
            writeln!(self.output, "{BANNER}")?;
            let Some(username) = self.prompt("Username: ")? else {
                return Ok(Flow::Quit);
            };
            let username = username.to_lowercase();
            if username == "exit" {
                return Ok(Flow::Quit);
            }
            let Some(password) = self.prompt("Password: ")? else {
                return Ok(Flow::Quit);
            };

            if self.auth.authenticate(role, &username, &password) {
                tracing::info!(%role, "login accepted");
                writeln!(self.output, "Login Success!\n")?;
                return Ok(Flow::Continue);
            }
            tracing::warn!(%role, username = %username, "login rejected");
            writeln!(self.output, "Invalid, please try again.\n")?;
        }
    }

    fn attendant_menu(&mut self) -> Result<Flow, SessionError> {
        loop {
            writeln!(
                self.output,
                "\nParking Attendant Dashboard\n1. Record Entry (IN)\n2. Record Exit (OUT)\n3. View Slot Availability\n0. Logout"
            )?;
            let Some(choice) = self.prompt("Choice: ")? else {
                return Ok(Flow::Quit);
            };
            let flow = match choice.as_str() {
                "1" => self.record_entry()?,
                "2" => self.record_exit()?,
                "3" => {
                    let slots = self.ledger.slot_availability().map_err(fatal)?;
                    render::slot_table(&mut self.output, &slots)?;
                    Flow::Continue
                }
                "0" => {
                    writeln!(self.output, "Logging out...")?;
                    return Ok(Flow::Continue);
                }
                _ => {
                    writeln!(self.output, "Choose 1, 2, 3 or 0.")?;
                    Flow::Continue
                }
            };
            if let Flow::Quit = flow {
                return Ok(Flow::Quit);
            }
        }
    }

    fn supervisor_menu(&mut self) -> Result<Flow, SessionError> {
        loop {
            writeln!(
                self.output,
                "\nSecurity Supervisor Dashboard\n1. Monitor Vehicle List\n2. Generate Today's Report\n0. Logout"
            )?;
            let Some(choice) = self.prompt("Choice: ")? else {
                return Ok(Flow::Quit);
            };
            match choice.as_str() {
                "1" => {
                    let latest = self.ledger.latest_by_plate().map_err(fatal)?;
                    render::latest_list(&mut self.output, &latest)?;
                }
                "2" => {
                    let report = self.ledger.report_for_today().map_err(fatal)?;
                    render::daily_report(&mut self.output, &report)?;
                }
                "0" => {
                    writeln!(self.output, "Logging out...")?;
                    return Ok(Flow::Continue);
                }
                _ => writeln!(self.output, "Choose 1, 2 or 0.")?,
            }
        }
    }

    fn record_entry(&mut self) -> Result<Flow, SessionError> {
        if let Err(err) = self.ledger.ensure_vacancy() {
            return self.reject(err);
        }
        let Some(plate) = self.prompt("Plate: ")? else {
            return Ok(Flow::Quit);
        };
        let plate = match self.ledger.admissible_plate(&plate) {
            Ok(plate) => plate,
            Err(err) => return self.reject(err),
        };
        let label = format!("Slot (1-{}): ", self.ledger.capacity());
        let Some(slot) = self.prompt(&label)? else {
            return Ok(Flow::Quit);
        };

        match self.ledger.record_entry(&plate, &slot) {
            Ok(event) => {
                writeln!(self.output, "Entry recorded. Slot: {}", event.slot)?;
                Ok(Flow::Continue)
            }
            Err(err) => self.reject(err),
        }
    }

    fn record_exit(&mut self) -> Result<Flow, SessionError> {
        let Some(plate) = self.prompt("Plate: ")? else {
            return Ok(Flow::Quit);
        };
        let plate = match rules::validate_plate(&plate) {
            Ok(plate) => plate,
            Err(err) => return self.reject(err),
        };
        let label = format!("Slot (1-{}): ", self.ledger.capacity());
        let Some(slot) = self.prompt(&label)? else {
            return Ok(Flow::Quit);
        };

        match self.ledger.record_exit(&plate, &slot) {
            Ok(event) => {
                writeln!(self.output, "Exit recorded. Slot: {}", event.slot)?;
                Ok(Flow::Continue)
            }
            Err(err) => self.reject(err),
        }
    }

    /// Prints a validation failure; storage failures end the session.
    fn reject(&mut self, err: LedgerError) -> Result<Flow, SessionError> {
        match err {
            LedgerError::Storage(storage) => Err(storage.into()),
            other => {
                writeln!(self.output, "{other}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn fatal(err: LedgerError) -> SessionError {
    match err {
        LedgerError::Storage(storage) => SessionError::Storage(storage),
        other => SessionError::Io(io::Error::other(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::{
        auth::{Credential, CredentialTable},
        clock::SteppingClock,
        persist::memory::MemoryEventStore,
    };

    fn console_output(script: &str, capacity: u32) -> String {
        let start = NaiveDate::from_ymd_opt(2025, 6, 2)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("valid datetime");
        let ledger = ParkingLedger::with_clock(
            Box::new(MemoryEventStore::new()),
            capacity,
            Box::new(SteppingClock::new(start, Duration::seconds(1))),
        );
        let auth = CredentialTable::new(vec![
            Credential {
                role: Role::Attendant,
                username: "attendant".into(),
                password: "a-pass".into(),
            },
            Credential {
                role: Role::Supervisor,
                username: "supervisor".into(),
                password: "s-pass".into(),
            },
        ]);
        let mut out = Vec::new();
        Console::new(ledger, auth, script.as_bytes(), &mut out)
            .run()
            .expect("session");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn wrong_role_credentials_are_refused() {
        let out = console_output("2\nattendant\na-pass\nexit\n", 2);
        assert!(out.contains("Invalid, please try again."));
        assert!(!out.contains("Login Success!"));
        assert!(out.ends_with("Goodbye.\n"));
    }

    #[test]
    fn entry_is_refused_before_plate_prompt_when_full() {
        let script = "1\nattendant\na-pass\n1\nAA\n1\n1\n0\n3\n";
        let out = console_output(script, 1);
        assert!(out.contains("Entry recorded. Slot: 1"));
        assert!(out.contains("parking full"));
        assert_eq!(out.matches("Plate: ").count(), 1);
    }

    #[test]
    fn eof_mid_prompt_ends_cleanly() {
        let out = console_output("1\nattendant\na-pass\n1\nAA\n", 3);
        assert!(out.ends_with("Goodbye.\n"));
        assert!(!out.contains("Entry recorded"));
    }
}
