//! Report assembly and rendering
//!
//! One [`Report`] is built per invocation and written in the requested
//! output format. IPv6 reports carry no netmask, wildcard, network or
//! broadcast fields.

use anyhow::Result;
use colored::Colorize;
use maskcalc_cidr::format::{self, with_commas};
use maskcalc_cidr::ParsedInput;
use maskcalc_core::AddressFamily;
use num_bigint::BigUint;
use serde::{Serialize, Serializer};
use std::io::Write;
use std::net::IpAddr;

const RULE_WIDTH: usize = 48;
const LABEL_WIDTH: usize = 31;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Bordered text report
    Human,
    /// JSON output (pretty-printed)
    Json,
    /// JSON output (compact)
    JsonCompact,
    /// CSV output, one field per row
    Csv,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub family: AddressFamily,
    pub input_shape: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_entered: Option<IpAddr>,
    pub cidr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask_hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<String>,
    #[serde(serialize_with = "decimal")]
    pub usable_addresses: BigUint,
    #[serde(serialize_with = "decimal")]
    pub total_addresses: BigUint,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeReport>,
}

/// Addresses of an entered block
#[derive(Debug, Serialize)]
pub struct RangeReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<IpAddr>,
    pub first_usable: Option<IpAddr>,
    pub last_usable: Option<IpAddr>,
}

fn decimal<S: Serializer>(n: &BigUint, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(n)
}

impl Report {
    pub fn from_parsed(parsed: &ParsedInput) -> Self {
        let mask = parsed.mask();
        let family = mask.family();

        let range = parsed.cidr().map(|cidr| {
            let range = cidr.range();
            RangeReport {
                network: family.has_broadcast().then_some(range.network),
                broadcast: range.broadcast,
                first_usable: range.first_usable,
                last_usable: range.last_usable,
            }
        });

        Self {
            family,
            input_shape: parsed.shape(),
            ip_entered: parsed.entered(),
            cidr: format::prefix_string(&mask),
            netmask: mask.ipv4_netmask().map(format::dotted_quad),
            netmask_hex: mask.ipv4_netmask().map(format::hex_mask),
            wildcard: mask.ipv4_wildcard().map(format::dotted_quad),
            usable_addresses: mask.usable(),
            total_addresses: mask.total(),
            range,
        }
    }

    /// Field name / value pairs in report order, counts undecorated
    fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![("family", self.family.to_string())];

        if let Some(ip) = self.ip_entered {
            rows.push(("ip_entered", ip.to_string()));
        }
        rows.push(("cidr", self.cidr.clone()));

        let mask_fields = [
            ("netmask", &self.netmask),
            ("netmask_hex", &self.netmask_hex),
            ("wildcard", &self.wildcard),
        ];
        for (name, value) in mask_fields {
            if let Some(value) = value {
                rows.push((name, value.clone()));
            }
        }

        rows.push(("usable_addresses", self.usable_addresses.to_string()));
        rows.push(("total_addresses", self.total_addresses.to_string()));

        if let Some(ref range) = self.range {
            if let Some(network) = range.network {
                rows.push(("network", network.to_string()));
            }
            if let Some(broadcast) = range.broadcast {
                rows.push(("broadcast", broadcast.to_string()));
            }
            rows.push(("first_usable", format::address(range.first_usable)));
            rows.push(("last_usable", format::address(range.last_usable)));
        }

        rows
    }
}

pub fn print_report(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => print_human(report),
        OutputFormat::Json => print_json(report, true)?,
        OutputFormat::JsonCompact => print_json(report, false)?,
        OutputFormat::Csv => write_csv(report, std::io::stdout())?,
    }
    Ok(())
}

fn line(label: &str, value: impl std::fmt::Display) {
    println!("{:.<width$}: {}", format!("{} = ", label), value, width = LABEL_WIDTH);
}

fn rule() {
    println!("{}", "-".repeat(RULE_WIDTH).dimmed());
}

fn print_human(report: &Report) {
    println!();
    rule();
    println!("{}", format!("{:^width$}", "TCP/IP NETWORK INFORMATION", width = RULE_WIDTH).bold().cyan());
    rule();

    if let Some(ip) = report.ip_entered {
        line("IP Entered", ip);
    }
    line("CIDR", &report.cidr);
    if let Some(ref netmask) = report.netmask {
        line("Netmask", netmask);
    }
    if let Some(ref hex) = report.netmask_hex {
        line("Netmask (hex)", hex);
    }
    if let Some(ref wildcard) = report.wildcard {
        line("Wildcard Bits", wildcard);
    }

    let usable = with_commas(&report.usable_addresses);
    match report.range {
        None => line("Usable IP Addresses", usable.green()),
        Some(ref range) => {
            rule();
            if let Some(network) = range.network {
                line("Network Address", network);
            }
            if let Some(broadcast) = range.broadcast {
                line("Broadcast Address", broadcast);
            }
            line("Usable IP Addresses", usable.green());
            line("First Usable IP Address", format::address(range.first_usable));
            line("Last Usable IP Address", format::address(range.last_usable));
        }
    }
    println!();
}

fn print_json(report: &Report, pretty: bool) -> Result<()> {
    if pretty {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", serde_json::to_string(report)?);
    }
    Ok(())
}

fn write_csv<W: Write>(report: &Report, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["field", "value"])?;
    for (name, value) in report.rows() {
        wtr.write_record([name, value.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}
