use crate::application::commands::Command;
use crate::domain::item::{LedgerItem, Price, Weight};
use crate::domain::payment::PaymentMethod;
use crate::domain::station::OperationalStatus;
use crate::error::{CheckoutError, Result};
use csv::StringRecord;
use rust_decimal::Decimal;
use std::io::Read;
use std::str::FromStr;

/// Reads a headerless script of administrative commands.
///
/// Every record starts with the command name followed by its arguments:
///
/// ```text
/// start,S1
/// scan,S1,Milk,3.99,1.00,1.00
/// pay,S1,cash,10.00
/// transfer,S1,S2
/// ```
///
/// Lines starting with `#` are comments.
pub struct CommandReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CommandReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .comment(Some(b'#'))
            .from_reader(source);
        Self { reader }
    }

    pub fn commands(self) -> impl Iterator<Item = Result<Command>> {
        self.reader.into_records().filter_map(|record| match record {
            Ok(record) if record.iter().all(str::is_empty) => None,
            Ok(record) => Some(parse_command(&record)),
            Err(e) => Some(Err(CheckoutError::from(e))),
        })
    }
}

struct Fields<'a> {
    record: &'a StringRecord,
    line: u64,
}

impl<'a> Fields<'a> {
    fn error(&self, reason: impl Into<String>) -> CheckoutError {
        CheckoutError::Parse {
            line: self.line,
            reason: reason.into(),
        }
    }

    fn text(&self, index: usize, name: &str) -> Result<&'a str> {
        match self.record.get(index) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(self.error(format!("missing {}", name))),
        }
    }

    fn station(&self, index: usize) -> Result<String> {
        self.text(index, "station id").map(str::to_string)
    }

    fn decimal(&self, index: usize, name: &str) -> Result<Decimal> {
        let raw = self.text(index, name)?;
        Decimal::from_str(raw).map_err(|e| self.error(format!("invalid {} '{}': {}", name, raw, e)))
    }

    fn price(&self, index: usize, name: &str) -> Result<Price> {
        Price::new(self.decimal(index, name)?).map_err(|e| self.error(e.to_string()))
    }

    fn weight(&self, index: usize, name: &str) -> Result<Weight> {
        Weight::new(self.decimal(index, name)?).map_err(|e| self.error(e.to_string()))
    }

    fn flag(&self, index: usize) -> Result<bool> {
        let raw = self.text(index, "approval flag")?;
        match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Ok(true),
            "false" | "no" | "n" | "0" => Ok(false),
            _ => Err(self.error(format!("invalid approval flag '{}'", raw))),
        }
    }
}

fn parse_command(record: &StringRecord) -> Result<Command> {
    let fields = Fields {
        record,
        line: record.position().map(|p| p.line()).unwrap_or_default(),
    };
    let name = fields.text(0, "command")?.to_ascii_lowercase();

    let command = match name.as_str() {
        "start" => Command::Start {
            station: fields.station(1)?,
        },
        "scan" => {
            let item = LedgerItem::new(
                fields.text(2, "item name")?,
                fields.price(3, "price")?,
                fields.weight(4, "weight")?,
            )
            .map_err(|e| fields.error(e.to_string()))?;
            Command::Scan {
                station: fields.station(1)?,
                item,
                scale_reading: fields.weight(5, "scale reading")?,
            }
        }
        "flag_age" => Command::FlagAge {
            station: fields.station(1)?,
        },
        "verify_age" => Command::VerifyAge {
            station: fields.station(1)?,
            approved: fields.flag(2)?,
        },
        "resolve_weight" => Command::ResolveWeight {
            station: fields.station(1)?,
            approved: fields.flag(2)?,
        },
        "pay" => {
            let method = match fields.text(2, "payment method")?.to_ascii_lowercase().as_str() {
                "cash" => PaymentMethod::Cash {
                    tendered: fields.price(3, "tendered amount")?,
                },
                "card" => PaymentMethod::Card {
                    card_ref: fields.text(3, "card reference")?.to_string(),
                },
                other => return Err(fields.error(format!("unknown payment method '{}'", other))),
            };
            Command::Pay {
                station: fields.station(1)?,
                method,
            }
        }
        "cancel" => Command::Cancel {
            station: fields.station(1)?,
        },
        "reset" => Command::Reset {
            station: fields.station(1)?,
        },
        "transfer" => Command::Transfer {
            source: fields.station(1)?,
            target: fields.station(2)?,
        },
        "override" => Command::Override {
            station: fields.station(1)?,
        },
        "set_status" => Command::SetStatus {
            station: fields.station(1)?,
            status: fields
                .text(2, "operational status")?
                .parse::<OperationalStatus>()
                .map_err(|e| fields.error(e.to_string()))?,
        },
        "view" => Command::View {
            station: fields.station(1)?,
        },
        "alerts" => Command::Alerts,
        other => return Err(fields.error(format!("unknown command '{}'", other))),
    };
    Ok(command)
}
