//! Type definitions for the Luxor pool API.
//!
//! This module contains the enumerations queries are parameterized with and
//! the canonical record types the response mappers produce:
//!
//! - [`HashRateUnit`]: power-of-1000 hash rate scale symbols
//! - [`MiningProfile`]: coin/algorithm identifiers
//! - [`HashrateInterval`], [`DetailsInterval`]: query durations and buckets
//! - [`Pagination`]: the `{first, last, offset}` window passed through
//!   verbatim
//! - [`Worker`], [`HashratePoint`], [`MiningSummary`], [`SubaccountHashrate`],
//!   [`HashrateScore`], [`Transaction`]: canonical records, one per query
//!   kind
//!
//! Canonical records are immutable value objects built once per response
//! element. The mappers do not deduplicate: if the service returns the same
//! worker or transaction twice, it appears twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::skip_serializing_none;

use crate::{
    coerce,
    error::{Error, Result},
};

/// Hash rate unit, a power-of-1000 scale up from hashes per second.
///
/// Each symbol maps to a fixed scale exponent; converting a raw reading
/// divides it by 1000 once per exponent step. Parsing any symbol outside
/// this set fails with [`Error::UnknownUnit`]; units are never guessed.
///
/// # Example
///
/// ```
/// use luxorsdk::HashRateUnit;
///
/// let unit: HashRateUnit = "TH".parse().unwrap();
/// assert_eq!(unit, HashRateUnit::Tera);
/// assert_eq!(unit.scale_exponent(), 4);
/// assert_eq!(unit.to_string(), "TH");
///
/// assert!("QH".parse::<HashRateUnit>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum HashRateUnit {
    /// Hashes per second
    #[serde(rename = "H")]
    #[display("H")]
    Hash,
    /// Kilohashes per second
    #[serde(rename = "KH")]
    #[display("KH")]
    Kilo,
    /// Megahashes per second
    #[serde(rename = "MH")]
    #[display("MH")]
    Mega,
    /// Gigahashes per second
    #[serde(rename = "GH")]
    #[display("GH")]
    Giga,
    /// Terahashes per second
    #[serde(rename = "TH")]
    #[display("TH")]
    Tera,
    /// Petahashes per second
    #[serde(rename = "PH")]
    #[display("PH")]
    Peta,
    /// Exahashes per second
    #[serde(rename = "EH")]
    #[display("EH")]
    Exa,
    /// Zettahashes per second
    #[serde(rename = "ZH")]
    #[display("ZH")]
    Zetta,
}

impl HashRateUnit {
    /// All recognized units in ascending scale order.
    pub const ALL: [Self; 8] = [
        Self::Hash,
        Self::Kilo,
        Self::Mega,
        Self::Giga,
        Self::Tera,
        Self::Peta,
        Self::Exa,
        Self::Zetta,
    ];

    /// Power-of-1000 scale exponent up from raw hashes per second.
    #[must_use]
    pub const fn scale_exponent(self) -> u32 {
        match self {
            Self::Hash => 0,
            Self::Kilo => 1,
            Self::Mega => 2,
            Self::Giga => 3,
            Self::Tera => 4,
            Self::Peta => 5,
            Self::Exa => 6,
            Self::Zetta => 7,
        }
    }
}

impl std::str::FromStr for HashRateUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "H" => Ok(Self::Hash),
            "KH" => Ok(Self::Kilo),
            "MH" => Ok(Self::Mega),
            "GH" => Ok(Self::Giga),
            "TH" => Ok(Self::Tera),
            "PH" => Ok(Self::Peta),
            "EH" => Ok(Self::Exa),
            "ZH" => Ok(Self::Zetta),
            other => Err(Error::UnknownUnit(other.to_string())),
        }
    }
}

/// Coin/algorithm identifier a query is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "UPPERCASE")]
pub enum MiningProfile {
    #[display("ARRR")]
    Arrr,
    #[display("BTC")]
    Btc,
    #[display("DASH")]
    Dash,
    #[display("DCR")]
    Dcr,
    #[display("KMD")]
    Kmd,
    #[display("LBC")]
    Lbc,
    #[display("SC")]
    Sc,
    #[display("SCP")]
    Scp,
    #[display("ZEC")]
    Zec,
    #[display("ZEN")]
    Zen,
    #[display("EQUI")]
    Equi,
    #[display("TBTC")]
    Tbtc,
    #[display("ETH")]
    Eth,
    #[display("TETH")]
    Teth,
}

/// Bucket and duration symbols for hashrate history queries.
///
/// # Example
///
/// ```
/// use luxorsdk::HashrateInterval;
///
/// assert_eq!(HashrateInterval::OneDay.to_string(), "_1_DAY");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
pub enum HashrateInterval {
    #[serde(rename = "_15_MINUTE")]
    #[display("_15_MINUTE")]
    FifteenMinutes,
    #[serde(rename = "_1_HOUR")]
    #[display("_1_HOUR")]
    OneHour,
    #[serde(rename = "_6_HOUR")]
    #[display("_6_HOUR")]
    SixHours,
    #[serde(rename = "_1_DAY")]
    #[display("_1_DAY")]
    OneDay,
}

/// Wall-clock window for the worker-details query.
///
/// Unset components are omitted from the wire payload.
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DetailsInterval {
    pub seconds: Option<u32>,
    pub minutes: Option<u32>,
    pub hours: Option<u32>,
    pub days: Option<u32>,
    pub months: Option<u32>,
    pub years: Option<u32>,
}

impl DetailsInterval {
    /// A window of `days` days.
    #[must_use]
    pub const fn days(days: u32) -> Self {
        Self {
            seconds: None,
            minutes: None,
            hours: None,
            days: Some(days),
            months: None,
            years: None,
        }
    }
}

impl Default for DetailsInterval {
    /// The service's conventional seven-day reporting window.
    fn default() -> Self {
        Self::days(7)
    }
}

/// Pagination window passed through verbatim to the service.
///
/// # Example
///
/// ```
/// use luxorsdk::Pagination;
///
/// let page = Pagination::first(50);
/// assert_eq!(page.first, Some(50));
/// assert_eq!(page.last, None);
/// ```
#[skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Pagination {
    pub first: Option<i64>,
    pub last: Option<i64>,
    pub offset: Option<i64>,
}

impl Pagination {
    /// The first `n` records.
    #[must_use]
    pub const fn first(n: i64) -> Self {
        Self {
            first: Some(n),
            last: None,
            offset: None,
        }
    }

    /// The last `n` records.
    #[must_use]
    pub const fn last(n: i64) -> Self {
        Self {
            first: None,
            last: Some(n),
            offset: None,
        }
    }

    /// Applies a call site's page-size default when the caller requested
    /// neither end of the window.
    pub(crate) fn or_first(self, default_first: i64) -> Self {
        if self.first.is_none() && self.last.is_none() {
            Self {
                first: Some(default_first),
                ..self
            }
        } else {
            self
        }
    }
}

/// Options for [`Client::worker_details`](crate::Client::worker_details).
#[derive(Debug, Clone, Default)]
pub struct WorkerDetailsOptions {
    /// Reporting window; the service convention of the last seven days when
    /// unset.
    pub duration: Option<DetailsInterval>,
    /// Coin override for this call.
    pub coin: Option<MiningProfile>,
    /// Unit override for this call.
    pub units: Option<HashRateUnit>,
    /// Pagination window.
    pub pagination: Pagination,
}

/// Options for
/// [`Client::worker_hashrate_history`](crate::Client::worker_hashrate_history).
#[derive(Debug, Clone)]
pub struct WorkerHashrateOptions {
    /// How far back the history reaches.
    pub duration: HashrateInterval,
    /// Bucket width of each returned point.
    pub bucket: HashrateInterval,
    /// Coin override for this call.
    pub coin: Option<MiningProfile>,
    /// Unit override for this call.
    pub units: Option<HashRateUnit>,
    /// Pagination window.
    pub pagination: Pagination,
}

/// A worker registered under a subaccount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Worker {
    /// Miner identifier assigned by the pool
    pub id: i64,
    /// Worker name as configured on the machine
    pub name: String,
    /// Coin the worker is mining
    pub coin: String,
    /// Last time the pool heard from the worker
    pub updated_at: DateTime<Utc>,
    /// Status string as reported by the pool (e.g. "Active")
    pub status: String,
    /// Hashrate scaled to the requested unit
    pub hashrate: f64,
    pub valid_shares: i64,
    pub stale_shares: i64,
    pub invalid_shares: i64,
    pub low_diff_shares: i64,
    pub bad_shares: i64,
    pub duplicate_shares: i64,
    /// Revenue as the pool's decimal string, preserved verbatim
    pub revenue: String,
    /// Share efficiency percentage
    pub efficiency: f64,
}

impl Worker {
    /// Maps one `getWorkerDetails` record.
    ///
    /// `updatedAt` carries the legacy offset correction; absent share
    /// counters read as zero.
    pub(crate) fn from_node(node: &Value, units: HashRateUnit) -> Result<Self> {
        Ok(Self {
            id: coerce::id("minerId", node)?,
            name: coerce::string("workerName", node)?,
            coin: coerce::string("miningProfileName", node)?,
            updated_at: coerce::timestamp("updatedAt", node.get("updatedAt"), true)?,
            status: coerce::string("status", node)?,
            hashrate: coerce::hashrate("hashrate", node.get("hashrate"), units)?,
            valid_shares: coerce::int("validShares", node.get("validShares"))?,
            stale_shares: coerce::int("staleShares", node.get("staleShares"))?,
            invalid_shares: coerce::int("invalidShares", node.get("invalidShares"))?,
            low_diff_shares: coerce::int("lowDiffShares", node.get("lowDiffShares"))?,
            bad_shares: coerce::int("badShares", node.get("badShares"))?,
            duplicate_shares: coerce::int("duplicateShares", node.get("duplicateShares"))?,
            revenue: coerce::string("revenue", node)?,
            efficiency: coerce::float("efficiency", node.get("efficiency"))?,
        })
    }
}

/// One bucketed point in a hashrate history series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashratePoint {
    /// Bucket timestamp, served without offset correction
    pub time: DateTime<Utc>,
    /// Hashrate scaled to the requested unit
    pub hashrate: f64,
    /// Number of samples aggregated into the bucket
    pub data_points: i64,
}

impl HashratePoint {
    /// Maps one `getWorkerHashrateHistory` record.
    pub(crate) fn from_node(node: &Value, units: HashRateUnit) -> Result<Self> {
        Ok(Self {
            time: coerce::timestamp("time", node.get("time"), false)?,
            hashrate: coerce::hashrate("hashrate", node.get("hashrate"), units)?,
            data_points: coerce::int("dataPoints", node.get("dataPoints"))?,
        })
    }

    /// Maps one entry of a nested `hashrateHistory` series.
    ///
    /// The nested series spells the sample counter `data_points`, unlike the
    /// top-level worker history.
    pub(crate) fn from_history_entry(node: &Value, units: HashRateUnit) -> Result<Self> {
        Ok(Self {
            time: coerce::timestamp("time", node.get("time"), false)?,
            hashrate: coerce::hashrate("hashrate", node.get("hashrate"), units)?,
            data_points: coerce::int("data_points", node.get("data_points"))?,
        })
    }
}

/// Aggregate mining summary for one subaccount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiningSummary {
    pub username: String,
    pub valid_shares: i64,
    pub invalid_shares: i64,
    pub stale_shares: i64,
    pub low_diff_shares: i64,
    pub bad_shares: i64,
    pub duplicate_shares: i64,
    /// Revenue as the pool's decimal string, preserved verbatim
    pub revenue: String,
    /// Hashrate scaled to the requested unit
    pub hashrate: f64,
}

impl MiningSummary {
    /// Maps the single `getMiningSummary` object.
    pub(crate) fn from_node(node: &Value, units: HashRateUnit) -> Result<Self> {
        Ok(Self {
            username: coerce::string("username", node)?,
            valid_shares: coerce::int("validShares", node.get("validShares"))?,
            invalid_shares: coerce::int("invalidShares", node.get("invalidShares"))?,
            stale_shares: coerce::int("staleShares", node.get("staleShares"))?,
            low_diff_shares: coerce::int("lowDiffShares", node.get("lowDiffShares"))?,
            bad_shares: coerce::int("badShares", node.get("badShares"))?,
            duplicate_shares: coerce::int("duplicateShares", node.get("duplicateShares"))?,
            revenue: coerce::string("revenue", node)?,
            hashrate: coerce::hashrate("hashrate", node.get("hashrate"), units)?,
        })
    }
}

/// Hashrate history for one subaccount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubaccountHashrate {
    pub username: String,
    /// Bucketed series in server order
    pub history: Vec<HashratePoint>,
}

impl SubaccountHashrate {
    /// Maps one `getAllSubaccountsHashrateHistory` record with its nested
    /// series.
    pub(crate) fn from_node(node: &Value, units: HashRateUnit) -> Result<Self> {
        let history = node
            .get("hashrateHistory")
            .and_then(Value::as_array)
            .ok_or(Error::MalformedResponseShape("hashrateHistory"))?
            .iter()
            .map(|entry| HashratePoint::from_history_entry(entry, units))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            username: coerce::string("username", node)?,
            history,
        })
    }
}

/// Daily hashrate score sample for a subaccount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HashrateScore {
    /// Sample day, served without offset correction
    pub date: DateTime<Utc>,
    pub efficiency: f64,
    /// Hashrate scaled to the requested unit
    pub hashrate: f64,
    pub revenue: f64,
    pub uptime_percentage: f64,
    pub uptime_total_minutes: i64,
    pub uptime_total_machines: i64,
}

impl HashrateScore {
    /// Maps one `getHashrateScoreHistory` record.
    pub(crate) fn from_node(node: &Value, units: HashRateUnit) -> Result<Self> {
        Ok(Self {
            date: coerce::timestamp("date", node.get("date"), false)?,
            efficiency: coerce::float("efficiency", node.get("efficiency"))?,
            hashrate: coerce::hashrate("hashrate", node.get("hashrate"), units)?,
            revenue: coerce::float("revenue", node.get("revenue"))?,
            uptime_percentage: coerce::float("uptimePercentage", node.get("uptimePercentage"))?,
            uptime_total_minutes: coerce::int(
                "uptimeTotalMinutes",
                node.get("uptimeTotalMinutes"),
            )?,
            uptime_total_machines: coerce::int(
                "uptimeTotalMachines",
                node.get("uptimeTotalMachines"),
            )?,
        })
    }
}

/// A payout transaction on a subaccount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// On-chain transaction identifier, preserved verbatim
    pub id: String,
    /// Settlement status string as reported by the pool
    pub status: String,
    /// Amount as the pool's decimal string, preserved verbatim
    pub amount: String,
    /// Creation time with the legacy offset correction applied
    pub created_at: DateTime<Utc>,
    /// Coin price at payout time
    pub coin_price: f64,
}

impl Transaction {
    /// Maps one `getTransactionHistory` record.
    pub(crate) fn from_node(node: &Value) -> Result<Self> {
        Ok(Self {
            id: coerce::string("transactionId", node)?,
            status: coerce::string("status", node)?,
            amount: coerce::string("amount", node)?,
            created_at: coerce::timestamp("createdAt", node.get("createdAt"), true)?,
            coin_price: coerce::float("coinPrice", node.get("coinPrice"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unit_symbol_round_trip() {
        for unit in HashRateUnit::ALL {
            let symbol = unit.to_string();
            assert_eq!(symbol.parse::<HashRateUnit>().unwrap(), unit);
            assert_eq!(serde_json::to_value(unit).unwrap(), json!(symbol));
        }
    }

    #[test]
    fn test_unknown_unit_symbol_fails() {
        let err = "QH".parse::<HashRateUnit>().unwrap_err();
        assert!(matches!(err, Error::UnknownUnit(symbol) if symbol == "QH"));
        assert!("th".parse::<HashRateUnit>().is_err());
        assert!("".parse::<HashRateUnit>().is_err());
    }

    #[test]
    fn test_mining_profile_serializes_to_symbol() {
        assert_eq!(serde_json::to_value(MiningProfile::Btc).unwrap(), json!("BTC"));
        assert_eq!(serde_json::to_value(MiningProfile::Zec).unwrap(), json!("ZEC"));
        assert_eq!(MiningProfile::Tbtc.to_string(), "TBTC");
    }

    #[test]
    fn test_hashrate_interval_serializes_to_symbol() {
        assert_eq!(
            serde_json::to_value(HashrateInterval::FifteenMinutes).unwrap(),
            json!("_15_MINUTE")
        );
        assert_eq!(
            serde_json::to_value(HashrateInterval::OneDay).unwrap(),
            json!("_1_DAY")
        );
    }

    #[test]
    fn test_details_interval_omits_unset_components() {
        let value = serde_json::to_value(DetailsInterval::default()).unwrap();
        assert_eq!(value, json!({ "days": 7 }));
    }

    #[test]
    fn test_pagination_default_applies_only_without_window() {
        let page = Pagination::default().or_first(1000);
        assert_eq!(page.first, Some(1000));

        let page = Pagination::first(25).or_first(1000);
        assert_eq!(page.first, Some(25));

        let page = Pagination::last(10).or_first(1000);
        assert_eq!(page.first, None);
        assert_eq!(page.last, Some(10));
    }

    #[test]
    fn test_worker_mapping() {
        let node = json!({
            "minerId": 4211,
            "workerName": "rig-01",
            "miningProfileName": "BTC",
            "updatedAt": "2024-06-01T00:00:00Z",
            "status": "Active",
            "hashrate": "5000000000000",
            "staleShares": "3",
            "invalidShares": 0,
            "lowDiffShares": null,
            "badShares": "",
            "duplicateShares": 2,
            "revenue": "0.00042170",
            "efficiency": "99.52"
        });

        let worker = Worker::from_node(&node, HashRateUnit::Tera).unwrap();
        assert_eq!(worker.id, 4211);
        assert_eq!(worker.name, "rig-01");
        assert_eq!(worker.hashrate, 5.0);
        // validShares is absent entirely and reads as zero
        assert_eq!(worker.valid_shares, 0);
        assert_eq!(worker.stale_shares, 3);
        assert_eq!(worker.low_diff_shares, 0);
        assert_eq!(worker.bad_shares, 0);
        assert_eq!(worker.duplicate_shares, 2);
        assert_eq!(worker.revenue, "0.00042170");
        assert_eq!(worker.efficiency, 99.52);
        assert_eq!(worker.updated_at.to_rfc3339(), "2024-05-31T19:00:00+00:00");
    }

    #[test]
    fn test_worker_mapping_rejects_malformed_counter() {
        let node = json!({
            "minerId": 1,
            "workerName": "rig-01",
            "miningProfileName": "BTC",
            "updatedAt": "2024-06-01T00:00:00Z",
            "status": "Active",
            "hashrate": "0",
            "validShares": "lots",
            "revenue": "0",
            "efficiency": "0"
        });

        assert!(matches!(
            Worker::from_node(&node, HashRateUnit::Tera).unwrap_err(),
            Error::InvalidNumericLiteral {
                field: "validShares",
                ..
            }
        ));
    }

    #[test]
    fn test_hashrate_point_mapping() {
        let node = json!({
            "time": "2024-06-01T08:00:00Z",
            "hashrate": "120000000000000",
            "dataPoints": "6"
        });

        let point = HashratePoint::from_node(&node, HashRateUnit::Tera).unwrap();
        assert_eq!(point.hashrate, 120.0);
        assert_eq!(point.data_points, 6);
        // no offset correction on history timestamps
        assert_eq!(point.time.to_rfc3339(), "2024-06-01T08:00:00+00:00");
    }

    #[test]
    fn test_mining_summary_mapping() {
        let node = json!({
            "username": "main",
            "validShares": "123456",
            "invalidShares": null,
            "staleShares": "78",
            "lowDiffShares": 0,
            "badShares": 0,
            "duplicateShares": 0,
            "revenue": "0.01500000",
            "hashrate": "98000000000000000"
        });

        let summary = MiningSummary::from_node(&node, HashRateUnit::Peta).unwrap();
        assert_eq!(summary.username, "main");
        assert_eq!(summary.valid_shares, 123_456);
        assert_eq!(summary.invalid_shares, 0);
        assert_eq!(summary.revenue, "0.01500000");
        assert_eq!(summary.hashrate, 98.0);
    }

    #[test]
    fn test_subaccount_hashrate_mapping_uses_snake_case_counter() {
        let node = json!({
            "username": "alpha",
            "hashrateHistory": [
                { "time": "2024-06-01T00:00:00Z", "hashrate": "2000000000000", "data_points": 12 },
                { "time": "2024-06-01T01:00:00Z", "hashrate": null, "data_points": "0" },
            ]
        });

        let record = SubaccountHashrate::from_node(&node, HashRateUnit::Tera).unwrap();
        assert_eq!(record.username, "alpha");
        assert_eq!(record.history.len(), 2);
        assert_eq!(record.history[0].hashrate, 2.0);
        assert_eq!(record.history[0].data_points, 12);
        assert_eq!(record.history[1].hashrate, 0.0);
    }

    #[test]
    fn test_subaccount_hashrate_requires_nested_series() {
        let node = json!({ "username": "alpha" });
        assert!(matches!(
            SubaccountHashrate::from_node(&node, HashRateUnit::Tera).unwrap_err(),
            Error::MalformedResponseShape("hashrateHistory")
        ));
    }

    #[test]
    fn test_hashrate_score_mapping() {
        let node = json!({
            "date": "2024-06-01",
            "efficiency": "99.1",
            "hashrate": "103000000000000",
            "revenue": "0.00021",
            "uptimePercentage": "100",
            "uptimeTotalMinutes": "1440",
            "uptimeTotalMachines": "12"
        });

        let score = HashrateScore::from_node(&node, HashRateUnit::Tera).unwrap();
        assert_eq!(score.date.to_rfc3339(), "2024-06-01T00:00:00+00:00");
        assert_eq!(score.efficiency, 99.1);
        assert_eq!(score.hashrate, 103.0);
        assert_eq!(score.revenue, 0.00021);
        assert_eq!(score.uptime_percentage, 100.0);
        assert_eq!(score.uptime_total_minutes, 1440);
        assert_eq!(score.uptime_total_machines, 12);
    }

    #[test]
    fn test_transaction_mapping() {
        let node = json!({
            "amount": "0.05000000",
            "coinPrice": "43250.55",
            "createdAt": "2024-03-15T10:00:00Z",
            "rowId": 9,
            "status": "CONFIRMED",
            "transactionId": "txn-abc123"
        });

        let transaction = Transaction::from_node(&node).unwrap();
        assert_eq!(transaction.id, "txn-abc123");
        assert_eq!(transaction.status, "CONFIRMED");
        assert_eq!(transaction.amount, "0.05000000");
        assert_eq!(transaction.coin_price, 43250.55);
        assert_eq!(
            transaction.created_at.to_rfc3339(),
            "2024-03-15T05:00:00+00:00"
        );
    }
}
