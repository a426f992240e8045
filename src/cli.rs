//! Command-line flags and interactive prompts.
//!
//! Provider and region can be passed as flags; anything omitted is asked
//! for interactively with a select prompt.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dialoguer::Select;

use crate::console::CloudProvider;

/// AWS regions offered by the region prompt, grouped by geography.
const REGION_GROUPS: &[(&str, &[&str])] = &[
    ("Europe", &["eu-central-1", "eu-west-1", "eu-west-2", "eu-west-3"]),
    ("Americas", &["us-east-1", "us-west-1", "us-west-2"]),
    (
        "APAC",
        &[
            "ap-southeast-1",
            "ap-southeast-2",
            "ap-northeast-1",
            "ap-northeast-2",
            "ap-south-1",
        ],
    ),
];

#[derive(Parser, Debug)]
#[command(name = "cloudtabs")]
#[command(about = "Log into a cloud console and open the common service pages as tabs")]
#[command(version)]
pub struct Cli {
    /// Cloud provider; prompts when omitted
    #[arg(short, long, value_enum)]
    pub provider: Option<CloudProvider>,

    /// AWS region token, e.g. eu-central-1; prompts when omitted (AWS only)
    #[arg(short, long)]
    pub region: Option<String>,

    /// Path to secrets.json (default: next to the executable, then the current directory)
    #[arg(long)]
    pub secrets: Option<PathBuf>,

    /// Run Chrome headless (flow smoke-testing; normal use wants a window)
    #[arg(long)]
    pub headless: bool,
}

impl Cli {
    /// Provider from the flag, or an interactive select.
    pub fn resolve_provider(&self) -> anyhow::Result<CloudProvider> {
        if let Some(provider) = self.provider {
            return Ok(provider);
        }
        prompt_provider()
    }

    /// Region from the flag, or an interactive select. Only meaningful for AWS.
    pub fn resolve_region(&self) -> anyhow::Result<String> {
        if let Some(ref region) = self.region {
            if region.trim().is_empty() {
                anyhow::bail!("region is not specified; please provide a valid region");
            }
            return Ok(region.clone());
        }
        prompt_region()
    }
}

fn prompt_provider() -> anyhow::Result<CloudProvider> {
    let providers = [CloudProvider::Aws, CloudProvider::Azure];
    let items: Vec<String> = providers.iter().map(ToString::to_string).collect();

    let selection = Select::new()
        .with_prompt("Select a cloud provider")
        .items(&items)
        .default(0)
        .interact()
        .context("provider selection failed")?;

    Ok(providers[selection])
}

fn prompt_region() -> anyhow::Result<String> {
    let regions = region_items();
    let labels: Vec<&str> = regions.iter().map(|(label, _)| label.as_str()).collect();

    let selection = Select::new()
        .with_prompt("Select a region")
        .items(&labels)
        .default(0)
        .interact()
        .context("region selection failed")?;

    Ok(regions[selection].1.clone())
}

/// Flattened region list as (display label, region token) pairs.
/// Every row is selectable; the geography shows up as part of the label.
fn region_items() -> Vec<(String, String)> {
    let mut items = Vec::new();
    for (group, regions) in REGION_GROUPS {
        for region in *regions {
            items.push((format!("{region}  ({group})"), (*region).to_string()));
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_items_are_all_selectable_tokens() {
        let items = region_items();
        assert!(!items.is_empty());
        for (label, token) in &items {
            // Labels embed the group; the token itself is always a real region
            assert!(label.starts_with(token.as_str()), "label {label} / token {token}");
            assert!(!token.contains("dummy"));
            assert!(token.contains('-'), "region tokens look like xx-yyyy-n: {token}");
        }
    }

    #[test]
    fn region_items_cover_all_groups() {
        let items = region_items();
        let total: usize = REGION_GROUPS.iter().map(|(_, r)| r.len()).sum();
        assert_eq!(items.len(), total);
        assert!(items.iter().any(|(l, _)| l.contains("Europe")));
        assert!(items.iter().any(|(l, _)| l.contains("Americas")));
        assert!(items.iter().any(|(l, _)| l.contains("APAC")));
    }

    #[test]
    fn explicit_region_flag_wins() {
        let cli = Cli {
            provider: Some(CloudProvider::Aws),
            region: Some("eu-west-1".to_string()),
            secrets: None,
            headless: false,
        };
        assert_eq!(cli.resolve_region().unwrap(), "eu-west-1");
    }

    #[test]
    fn blank_region_flag_is_rejected() {
        let cli = Cli {
            provider: Some(CloudProvider::Aws),
            region: Some("   ".to_string()),
            secrets: None,
            headless: false,
        };
        assert!(cli.resolve_region().is_err());
    }
}
