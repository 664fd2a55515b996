//! Tests for the aggregation pipeline.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use super::*;
use crate::command::CommandOutput;
use crate::command::mock::ScriptedRunner;
use crate::engine::testing::{
    ETHERNET_ID, SHOW_CONFIG, SHOW_DNS, SHOW_INTERFACE, VIRTUALBOX_ID, WLAN_ID, chinese_host, english_host,
};
use crate::network::Ipv4Binding;
use crate::network::extract::fixtures;
use crate::time::FixedClock;

fn ip(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

async fn aggregator_for(runner: ScriptedRunner) -> ConfigAggregator<ScriptedRunner, FixedClock> {
    let catalog = Arc::new(AdapterCatalog::new());
    let aggregator = ConfigAggregator::with_clock(
        runner,
        CommandSet::default(),
        Arc::clone(&catalog),
        FixedClock::at_unix(1_700_000_000),
    );
    let records = aggregator.enumerate().await.expect("enumeration output");
    catalog.replace(records);
    aggregator
}

mod full_pipeline {
    use super::*;

    #[tokio::test]
    async fn merges_all_sources_for_ethernet() {
        let aggregator = aggregator_for(english_host()).await;
        let config = aggregator.aggregate(ETHERNET_ID).await.unwrap();

        assert_eq!(config.record.display_name, "Ethernet");
        assert_eq!(
            config.ipv4,
            vec![
                Ipv4Binding::new(ip("192.168.1.20"), ip("255.255.255.0")),
                Ipv4Binding::new(ip("10.0.0.5"), ip("255.0.0.0")),
            ]
        );
        assert_eq!(
            config.ipv6_addresses,
            vec![
                "2001:db8::20".parse::<Ipv6Addr>().unwrap(),
                "2001:db8::abcd".parse().unwrap()
            ]
        );
        assert_eq!(config.gateway, Some(ip("192.168.1.1")));
        assert_eq!(
            config.dns_servers,
            vec![ip("9.9.9.9"), ip("8.8.8.8"), ip("1.1.1.1")]
        );
        assert!(!config.dhcp_enabled);
        assert_eq!(config.link_speed.as_deref(), Some("1.0 Gbps"));
        assert_eq!(config.interface_class, InterfaceClass::Wired);
        assert_eq!(config.status, AdapterStatus::Connected);
        assert_eq!(config.resolved_at, FixedClock::at_unix(1_700_000_000).0);
        assert_eq!(config.primary().map(|b| b.address), Some(ip("192.168.1.20")));
    }

    #[tokio::test]
    async fn runs_sources_in_fixed_order() {
        let aggregator = aggregator_for(english_host()).await;
        aggregator.aggregate(ETHERNET_ID).await.unwrap();

        let programs: Vec<String> = aggregator
            .runner
            .calls()
            .iter()
            .skip(1)
            .map(|c| format!("{} {}", c.program, c.args.first().cloned().unwrap_or_default()))
            .collect();
        assert_eq!(
            programs,
            [
                "wmic path",
                "netsh interface",
                "ipconfig /all",
                "netsh interface",
                "wmic nic",
                "netsh interface"
            ]
        );
    }

    #[tokio::test]
    async fn wireless_adapter_falls_back_to_receive_rate() {
        let aggregator = aggregator_for(english_host()).await;
        let config = aggregator.aggregate(WLAN_ID).await.unwrap();

        assert_eq!(config.link_speed.as_deref(), Some("1201 Mbps"));
        assert_eq!(config.interface_class, InterfaceClass::Wireless);
        assert_eq!(
            config.ipv4,
            vec![Ipv4Binding::new(ip("192.168.0.105"), ip("255.255.255.0"))]
        );
        assert!(config.dhcp_enabled);
        assert_eq!(
            config.dns_servers,
            vec![ip("9.9.9.9"), ip("8.8.8.8"), ip("192.168.0.1"), ip("1.1.1.1")]
        );
    }

    #[tokio::test]
    async fn wired_adapter_never_queries_wireless() {
        let aggregator = aggregator_for(english_host()).await;
        aggregator.aggregate(ETHERNET_ID).await.unwrap();

        assert!(aggregator.runner.calls_matching("netsh", &["wlan"]).is_empty());
    }

    #[tokio::test]
    async fn chinese_locale() {
        let aggregator = aggregator_for(chinese_host()).await;
        let config = aggregator.aggregate("{11110000-0001}").await.unwrap();

        assert_eq!(config.record.display_name, "以太网");
        assert_eq!(
            config.ipv4,
            vec![Ipv4Binding::new(ip("192.168.31.100"), ip("255.255.255.0"))]
        );
        assert_eq!(config.gateway, Some(ip("192.168.31.1")));
        assert_eq!(
            config.dns_servers,
            vec![ip("192.168.31.1"), ip("114.114.114.114")]
        );
        assert!(config.dhcp_enabled);
        assert_eq!(config.status, AdapterStatus::Connected);
        assert_eq!(config.interface_class, InterfaceClass::Wired);
        assert_eq!(config.link_speed, None);
    }
}

mod resilience {
    use super::*;

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let aggregator = aggregator_for(english_host()).await;
        let result = aggregator.aggregate("{nope}").await;

        assert!(matches!(result, Err(EngineError::AdapterNotFound { id }) if id == "{nope}"));
    }

    #[tokio::test]
    async fn empty_detail_dump_and_missing_status_table() {
        let runner = ScriptedRunner::new()
            .on_stdout("wmic", &["path"], fixtures::ENUMERATION_EN)
            .on_stdout("netsh", SHOW_CONFIG, fixtures::IPV4_CONFIG_EN)
            .on_stdout("ipconfig", &["/all"], "")
            .on_stdout("netsh", SHOW_DNS, fixtures::DNS_EN);
        let aggregator = aggregator_for(runner).await;

        let config = aggregator.aggregate(ETHERNET_ID).await.unwrap();

        assert_eq!(config.ipv4_addresses(), vec![ip("192.168.1.20"), ip("10.0.0.5")]);
        assert_eq!(config.subnet_masks(), vec![ip("255.255.255.0"), ip("255.0.0.0")]);
        assert!(config.ipv6_addresses.is_empty());
        assert_eq!(config.gateway, Some(ip("192.168.1.1")));
        assert_eq!(
            config.dns_servers,
            vec![ip("9.9.9.9"), ip("8.8.8.8"), ip("1.1.1.1")]
        );
        assert_eq!(config.status, AdapterStatus::Connected);
    }

    #[tokio::test]
    async fn fallback_status_for_disabled_adapter() {
        let runner = ScriptedRunner::new()
            .on_stdout("wmic", &["path"], fixtures::ENUMERATION_EN)
            .on_stdout("netsh", SHOW_INTERFACE, "Admin State    State\n-----\n");
        let aggregator = aggregator_for(runner).await;

        let config = aggregator.aggregate(VIRTUALBOX_ID).await.unwrap();

        assert_eq!(config.status, AdapterStatus::Disabled);
        assert!(config.ipv4.is_empty());
        assert!(config.dns_servers.is_empty());
        assert_eq!(config.link_speed, None);
    }

    #[tokio::test]
    async fn timed_out_and_failing_sources_contribute_nothing() {
        let runner = ScriptedRunner::new()
            .on_stdout("wmic", &["path"], fixtures::ENUMERATION_EN)
            .on(
                "netsh",
                SHOW_CONFIG,
                CommandOutput::failure(1, "", "The filename, directory name, or volume label syntax is incorrect."),
            )
            .on("ipconfig", &["/all"], CommandOutput::timeout())
            .on_stdout("netsh", SHOW_INTERFACE, fixtures::INTERFACES_EN);
        let aggregator = aggregator_for(runner).await;

        let config = aggregator.aggregate(ETHERNET_ID).await.unwrap();

        assert!(config.ipv4.is_empty());
        assert_eq!(config.gateway, None);
        assert!(!config.dhcp_enabled);
        assert_eq!(config.status, AdapterStatus::Connected);
    }

    #[tokio::test]
    async fn cached_record_used_when_enumeration_reread_fails() {
        let runner = ScriptedRunner::new()
            .on_stdout("wmic", &["path"], fixtures::ENUMERATION_EN)
            .missing("wmic", &["path"]);
        let aggregator = aggregator_for(runner).await;

        let config = aggregator.aggregate(ETHERNET_ID).await.unwrap();

        assert_eq!(config.record.display_name, "Ethernet");
        assert_eq!(config.status, AdapterStatus::Connected);
    }

    #[tokio::test]
    async fn reread_refreshes_the_fallback_status_code() {
        let disabled = fixtures::ENUMERATION_EN.replace(",Ethernet,2", ",Ethernet,0");
        let runner = ScriptedRunner::new()
            .on_stdout("wmic", &["path"], fixtures::ENUMERATION_EN)
            .on_stdout("wmic", &["path"], &disabled);
        let aggregator = aggregator_for(runner).await;

        let config = aggregator.aggregate(ETHERNET_ID).await.unwrap();

        assert_eq!(config.record.status_code, "0");
        assert!(!config.record.enabled);
        assert_eq!(config.status, AdapterStatus::Disabled);
    }
}
