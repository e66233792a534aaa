//! Example: Look up a NOVA business partner by card number or TKID
//!
//! This example demonstrates:
//! - Building a configuration from environment variables
//! - Creating a `NovaApiClient`
//! - Searching the partner directory
//! - Reading the partner fields and the server messages
//!
//! Run with:
//!   NOVA_SSO_URL=https://sso-int.sbb.ch \
//!   NOVA_WS_URL=https://nova-int-ws.sbb.ch \
//!   NOVA_CLIENT_ID=... NOVA_CLIENT_SECRET=... \
//!   cargo run --example search_partner -- GAQ577

use novaapi::{NovaApiClient, NovaConfig, SearchPartnerParams};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let card_number = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "GAQ577".to_string());

    println!("NOVA - Partner Search");
    println!("=====================\n");

    let mut config = NovaConfig::default();
    config.sso.http.base_url = std::env::var("NOVA_SSO_URL").ok();
    config.sso.client_id = std::env::var("NOVA_CLIENT_ID").unwrap_or_default();
    config.sso.client_secret = std::env::var("NOVA_CLIENT_SECRET").unwrap_or_default();
    config.webservice.base_url = std::env::var("NOVA_WS_URL").ok();

    let client = NovaApiClient::new(config)?;

    println!("Searching for card number '{}'...", card_number);
    let params = SearchPartnerParams {
        card_number: Some(card_number),
        ..SearchPartnerParams::default()
    };

    let result = client.search_partner(&params).await?;
    println!("Found {} partner(s)\n", result.partners.len());

    for (i, partner) in result.partners.iter().enumerate() {
        println!("{}. TKID: {}", i + 1, partner.tk_id);
        if let (Some(first), Some(last)) = (&partner.first_name, &partner.last_name) {
            println!("   Name: {} {}", first, last);
        }
        if let Some(street) = &partner.street {
            println!("   Street: {}", street);
        }
        if let (Some(postal_code), Some(city)) = (&partner.postal_code, &partner.city) {
            println!("   City: {} {}", postal_code, city);
        }
        if let Some(email) = &partner.email {
            println!("   Mail: {}", email);
        }
        if let Some(date_of_birth) = partner.date_of_birth {
            println!("   Born: {}", date_of_birth);
        }
        if let Some(changed_at) = partner.changed_at {
            println!("   Changed: {} UTC", changed_at);
        }
        println!();
    }

    if !result.messages.is_empty() {
        println!("Server messages:");
        for message in &result.messages {
            println!(
                "  [{}] {}",
                message.code.as_deref().unwrap_or("-"),
                message.message.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}
