//! HTTP client for the Luxor pool GraphQL API.
//!
//! [`Client`] owns the authenticated transport: it serializes one variables
//! payload per call, POSTs the query document, and hands the untyped `data`
//! tree to the response mappers in [`crate::types`]. All normalization
//! happens after the single awaited network call, so concurrent calls never
//! interfere.
//!
//! # Examples
//!
//! ## List subaccounts
//!
//! ```no_run
//! use luxorsdk::{Client, HashRateUnit, MiningProfile, Pagination};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = Client::new(MiningProfile::Btc, HashRateUnit::Tera)
//!     .with_key("your-api-key");
//!
//! for name in client.subaccounts(Pagination::default()).await? {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Query worker details
//!
//! ```no_run
//! use luxorsdk::{Client, HashRateUnit, MiningProfile, WorkerDetailsOptions};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = Client::new(MiningProfile::Btc, HashRateUnit::Tera)
//!     .with_key("your-api-key");
//!
//! let workers = client
//!     .worker_details("my-subaccount", WorkerDetailsOptions::default())
//!     .await?;
//!
//! for worker in workers {
//!     println!("{}: {} TH/s, {} valid shares", worker.name, worker.hashrate, worker.valid_shares);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use serde_with::skip_serializing_none;
use url::Url;

use crate::{
    coerce,
    error::{Error, Result},
    response::{self, Envelope, Request},
    types::{
        DetailsInterval, HashRateUnit, HashrateInterval, HashratePoint, HashrateScore,
        MiningProfile, MiningSummary, Pagination, SubaccountHashrate, Transaction, Worker,
        WorkerDetailsOptions, WorkerHashrateOptions,
    },
};

/// Hosted GraphQL endpoint of the pool.
const DEFAULT_ENDPOINT: &str = "https://api.beta.luxor.tech/graphql";

/// Header carrying the static API key.
const API_KEY_HEADER: &str = "X-LUX-API-KEY";

/// Page size applied to worker details when the caller requests neither end
/// of the window.
const WORKER_DETAILS_PAGE: i64 = 10_000;

/// Page size applied to subaccount listing when the caller requests neither
/// end of the window.
const SUBACCOUNT_PAGE: i64 = 1_000;

/// Organization slug scoping pool-wide hashrate queries.
const ORG_SLUG: &str = "luxor";

fn variables<T: Serialize>(payload: &T) -> Result<Value> {
    serde_json::to_value(payload).map_err(|err| Error::Transport(err.to_string()))
}

/// Authenticated client for the pool's query API.
///
/// The client carries per-call defaults for the mining profile and the hash
/// rate unit; every query method accepts overrides. Construction alone never
/// touches the network, and a client without an API key fails each call with
/// [`Error::MissingCredential`] before any request is made.
///
/// # Example
///
/// ```
/// use luxorsdk::{Client, HashRateUnit, MiningProfile};
///
/// let client = Client::new(MiningProfile::Btc, HashRateUnit::Tera)
///     .with_key("your-api-key");
/// ```
pub struct Client {
    http_client: reqwest::Client,
    endpoint: Url,
    key: Option<String>,
    coin: MiningProfile,
    units: HashRateUnit,
}

impl Client {
    /// Creates a client for the hosted pool endpoint.
    ///
    /// `coin` and `units` become the defaults applied when a call does not
    /// override them. Attach an API key with [`Client::with_key`] before
    /// issuing queries.
    pub fn new(coin: MiningProfile, units: HashRateUnit) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .tcp_nodelay(true)
            .build()
            .unwrap();

        Self {
            http_client,
            endpoint: Url::parse(DEFAULT_ENDPOINT).unwrap(),
            key: None,
            coin,
            units,
        }
    }

    /// Sets the API key attached to every query.
    pub fn with_key(self, key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..self
        }
    }

    /// Sets a custom endpoint, e.g. a proxy in front of the pool API.
    pub fn with_url(self, endpoint: Url) -> Self {
        Self { endpoint, ..self }
    }

    /// Returns the default mining profile queries are scoped to.
    #[must_use]
    pub const fn coin(&self) -> MiningProfile {
        self.coin
    }

    /// Returns the default unit hash rate figures are scaled to.
    #[must_use]
    pub const fn units(&self) -> HashRateUnit {
        self.units
    }

    /// Executes one parameterized query and returns the untyped `data` tree.
    ///
    /// Wire failures, non-2xx statuses and errors reported in the GraphQL
    /// envelope all surface as [`Error::Transport`]; nothing is retried.
    async fn execute(&self, query: &'static str, variables: Value) -> Result<Value> {
        let key = self.key.as_deref().ok_or(Error::MissingCredential)?;

        log::debug!("executing pool query against {}", self.endpoint);
        let envelope: Envelope = self
            .http_client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, key)
            .json(&Request { query, variables })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .iter()
                .map(|err| err.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            log::warn!("pool query rejected upstream: {message}");
            return Err(Error::Transport(message));
        }

        envelope
            .data
            .ok_or_else(|| Error::Transport("response carried no data".into()))
    }

    /// Lists the subaccounts visible to the API key.
    ///
    /// The window defaults to the first 1000 subaccounts when the caller
    /// requests neither end of it.
    pub async fn subaccounts(&self, pagination: Pagination) -> Result<Vec<String>> {
        const QUERY: &str = r#"query getSubaccountAccessList($first: Int, $last: Int, $offset: Int) {
            users(first: $first, last: $last, offset: $offset) {
                nodes {
                    username
                }
            }
        }"#;

        let page = pagination.or_first(SUBACCOUNT_PAGE);
        let data = self.execute(QUERY, variables(&page)?).await?;

        response::records(&data, "users")?
            .into_iter()
            .map(|node| coerce::string("username", node))
            .collect()
    }

    /// Returns the workers on a subaccount with their share counters,
    /// efficiency and current hashrate.
    ///
    /// The window defaults to the first 10000 workers when the caller
    /// requests neither end of it; the reporting duration defaults to the
    /// last seven days.
    pub async fn worker_details(
        &self,
        subaccount: &str,
        options: WorkerDetailsOptions,
    ) -> Result<Vec<Worker>> {
        const QUERY: &str = r#"query getWorkerDetails($mpn: MiningProfileName!, $duration: IntervalInput!, $uname: String!, $first: Int, $last: Int, $offset: Int) {
            getWorkerDetails(mpn: $mpn, duration: $duration, uname: $uname, first: $first, last: $last, offset: $offset) {
                edges {
                    node {
                        minerId
                        workerName
                        miningProfileName
                        updatedAt
                        status
                        hashrate
                        validShares
                        staleShares
                        invalidShares
                        lowDiffShares
                        badShares
                        duplicateShares
                        revenue
                        efficiency
                    }
                }
            }
        }"#;

        #[skip_serializing_none]
        #[derive(Serialize)]
        struct Variables<'a> {
            mpn: MiningProfile,
            duration: DetailsInterval,
            uname: &'a str,
            first: Option<i64>,
            last: Option<i64>,
            offset: Option<i64>,
        }

        let units = options.units.unwrap_or(self.units);
        let page = options.pagination.or_first(WORKER_DETAILS_PAGE);
        let data = self
            .execute(
                QUERY,
                variables(&Variables {
                    mpn: options.coin.unwrap_or(self.coin),
                    duration: options.duration.unwrap_or_default(),
                    uname: subaccount,
                    first: page.first,
                    last: page.last,
                    offset: page.offset,
                })?,
            )
            .await?;

        response::records(&data, "getWorkerDetails")?
            .into_iter()
            .map(|node| Worker::from_node(node, units))
            .collect()
    }

    /// Returns the bucketed hashrate history of one worker.
    pub async fn worker_hashrate_history(
        &self,
        subaccount: &str,
        worker: &str,
        options: WorkerHashrateOptions,
    ) -> Result<Vec<HashratePoint>> {
        const QUERY: &str = r#"query getWorkerHashrateHistory($username: String!, $workerName: String!, $mpn: MiningProfileName!, $inputBucket: HashrateIntervals!, $inputDuration: HashrateIntervals!, $first: Int, $last: Int, $offset: Int) {
            getWorkerHashrateHistory(username: $username, workerName: $workerName, mpn: $mpn, inputDuration: $inputDuration, inputBucket: $inputBucket, first: $first, last: $last, offset: $offset) {
                edges {
                    node {
                        time,
                        hashrate,
                        dataPoints
                    }
                }
            }
        }"#;

        #[skip_serializing_none]
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables<'a> {
            username: &'a str,
            worker_name: &'a str,
            mpn: MiningProfile,
            input_duration: HashrateInterval,
            input_bucket: HashrateInterval,
            first: Option<i64>,
            last: Option<i64>,
            offset: Option<i64>,
        }

        let units = options.units.unwrap_or(self.units);
        let data = self
            .execute(
                QUERY,
                variables(&Variables {
                    username: subaccount,
                    worker_name: worker,
                    mpn: options.coin.unwrap_or(self.coin),
                    input_duration: options.duration,
                    input_bucket: options.bucket,
                    first: options.pagination.first,
                    last: options.pagination.last,
                    offset: options.pagination.offset,
                })?,
            )
            .await?;

        response::records(&data, "getWorkerHashrateHistory")?
            .into_iter()
            .map(|node| HashratePoint::from_node(node, units))
            .collect()
    }

    /// Returns the aggregate mining summary of a subaccount over `duration`.
    pub async fn mining_summary(
        &self,
        subaccount: &str,
        duration: HashrateInterval,
        units: Option<HashRateUnit>,
        coin: Option<MiningProfile>,
    ) -> Result<MiningSummary> {
        const QUERY: &str = r#"query getMiningSummary($mpn: MiningProfileName!, $userName: String!, $inputDuration: HashrateIntervals!) {
            getMiningSummary(mpn: $mpn, userName: $userName, inputDuration: $inputDuration) {
                username
                validShares
                invalidShares
                staleShares
                lowDiffShares
                badShares
                duplicateShares
                revenue
                hashrate
            }
        }"#;

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables<'a> {
            mpn: MiningProfile,
            input_duration: HashrateInterval,
            user_name: &'a str,
        }

        let units = units.unwrap_or(self.units);
        let data = self
            .execute(
                QUERY,
                variables(&Variables {
                    mpn: coin.unwrap_or(self.coin),
                    input_duration: duration,
                    user_name: subaccount,
                })?,
            )
            .await?;

        MiningSummary::from_node(response::member(&data, "getMiningSummary")?, units)
    }

    /// Returns the bucketed hashrate history of every subaccount.
    pub async fn all_subaccounts_hashrate_history(
        &self,
        interval: HashrateInterval,
        units: Option<HashRateUnit>,
        coin: Option<MiningProfile>,
        pagination: Pagination,
    ) -> Result<Vec<SubaccountHashrate>> {
        const QUERY: &str = r#"query getAllSubaccountsHashrateHistory($mpn: MiningProfileName!, $inputInterval: HashrateIntervals, $first: Int, $last: Int, $offset: Int) {
            getAllSubaccountsHashrateHistory(mpn: $mpn, inputInterval: $inputInterval, first: $first, last: $last, offset: $offset) {
                edges {
                    node {
                        hashrateHistory
                        username
                    }
                }
            }
        }"#;

        #[skip_serializing_none]
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables {
            mpn: MiningProfile,
            input_interval: HashrateInterval,
            first: Option<i64>,
            last: Option<i64>,
            offset: Option<i64>,
        }

        let units = units.unwrap_or(self.units);
        let data = self
            .execute(
                QUERY,
                variables(&Variables {
                    mpn: coin.unwrap_or(self.coin),
                    input_interval: interval,
                    first: pagination.first,
                    last: pagination.last,
                    offset: pagination.offset,
                })?,
            )
            .await?;

        response::records(&data, "getAllSubaccountsHashrateHistory")?
            .into_iter()
            .map(|node| SubaccountHashrate::from_node(node, units))
            .collect()
    }

    /// Returns the current total hashrate of the parent account's profile.
    pub async fn profile_hashrate(
        &self,
        units: Option<HashRateUnit>,
        coin: Option<MiningProfile>,
    ) -> Result<f64> {
        const QUERY: &str = r#"query getProfileHashrate($mpn: MiningProfileName!) {
            getProfileHashrate(mpn: $mpn)
        }"#;

        #[derive(Serialize)]
        struct Variables {
            mpn: MiningProfile,
        }

        let units = units.unwrap_or(self.units);
        let data = self
            .execute(
                QUERY,
                variables(&Variables {
                    mpn: coin.unwrap_or(self.coin),
                })?,
            )
            .await?;

        coerce::hashrate("getProfileHashrate", data.get("getProfileHashrate"), units)
    }

    /// Returns the daily hashrate score history of a subaccount, most recent
    /// day first.
    pub async fn hashrate_score_history(
        &self,
        subaccount: &str,
        units: Option<HashRateUnit>,
        coin: Option<MiningProfile>,
        pagination: Pagination,
    ) -> Result<Vec<HashrateScore>> {
        const QUERY: &str = r#"query getHashrateScoreHistory($mpn: MiningProfileName!, $uname: String!, $first: Int, $last: Int, $offset: Int) {
            getHashrateScoreHistory(mpn: $mpn, uname: $uname, first: $first, last: $last, offset: $offset, orderBy: DATE_DESC) {
                nodes {
                    date
                    efficiency
                    hashrate
                    revenue
                    uptimePercentage
                    uptimeTotalMinutes
                    uptimeTotalMachines
                }
            }
        }"#;

        #[skip_serializing_none]
        #[derive(Serialize)]
        struct Variables<'a> {
            mpn: MiningProfile,
            uname: &'a str,
            first: Option<i64>,
            last: Option<i64>,
            offset: Option<i64>,
        }

        let units = units.unwrap_or(self.units);
        let data = self
            .execute(
                QUERY,
                variables(&Variables {
                    mpn: coin.unwrap_or(self.coin),
                    uname: subaccount,
                    first: pagination.first,
                    last: pagination.last,
                    offset: pagination.offset,
                })?,
            )
            .await?;

        response::records(&data, "getHashrateScoreHistory")?
            .into_iter()
            .map(|node| HashrateScore::from_node(node, units))
            .collect()
    }

    /// Returns the payout transaction history of a subaccount, most recent
    /// first.
    pub async fn transaction_history(
        &self,
        subaccount: &str,
        coin: Option<MiningProfile>,
        pagination: Pagination,
    ) -> Result<Vec<Transaction>> {
        const QUERY: &str = r#"query getTransactionHistory($uname: String!, $cid: CurrencyProfileName!, $first: Int, $last: Int, $offset: Int) {
            getTransactionHistory(uname: $uname, cid: $cid, first: $first, last: $last, offset: $offset, orderBy: CREATED_AT_DESC) {
                edges {
                    node {
                        amount
                        coinPrice
                        createdAt
                        rowId
                        status
                        transactionId
                    }
                }
            }
        }"#;

        #[skip_serializing_none]
        #[derive(Serialize)]
        struct Variables<'a> {
            uname: &'a str,
            cid: MiningProfile,
            first: Option<i64>,
            last: Option<i64>,
            offset: Option<i64>,
        }

        let data = self
            .execute(
                QUERY,
                variables(&Variables {
                    uname: subaccount,
                    cid: coin.unwrap_or(self.coin),
                    first: pagination.first,
                    last: pagination.last,
                    offset: pagination.offset,
                })?,
            )
            .await?;

        response::records(&data, "getTransactionHistory")?
            .into_iter()
            .map(Transaction::from_node)
            .collect()
    }

    /// Returns the current total hashrate of the whole pool for a coin.
    pub async fn pool_hashrate(
        &self,
        units: Option<HashRateUnit>,
        coin: Option<MiningProfile>,
    ) -> Result<f64> {
        const QUERY: &str = r#"query getPoolHashrate($mpn: MiningProfileName!, $orgSlug: String!) {
            getPoolHashrate(mpn: $mpn, orgSlug: $orgSlug)
        }"#;

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Variables {
            mpn: MiningProfile,
            org_slug: &'static str,
        }

        let units = units.unwrap_or(self.units);
        let data = self
            .execute(
                QUERY,
                variables(&Variables {
                    mpn: coin.unwrap_or(self.coin),
                    org_slug: ORG_SLUG,
                })?,
            )
            .await?;

        coerce::hashrate("getPoolHashrate", data.get("getPoolHashrate"), units)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_client_without_key_fails_fast() {
        let client = Client::new(MiningProfile::Btc, HashRateUnit::Tera);

        let err = client.subaccounts(Pagination::default()).await.unwrap_err();
        assert!(matches!(err, Error::MissingCredential));
    }

    #[test]
    fn test_pagination_variables_omit_unset_members() {
        let page = Pagination::default().or_first(SUBACCOUNT_PAGE);
        assert_eq!(
            variables(&page).unwrap(),
            json!({ "first": SUBACCOUNT_PAGE })
        );
    }

    #[test]
    fn test_client_defaults_are_exposed() {
        let client = Client::new(MiningProfile::Zec, HashRateUnit::Giga);
        assert_eq!(client.coin(), MiningProfile::Zec);
        assert_eq!(client.units(), HashRateUnit::Giga);
    }
}
