//! Sales series for the dashboard chart.
//!
//! A [`Window`] lays out the buckets for a period ending at "today"; the store
//! returns per-bucket sums for one owner and [`Window::fill`] aligns them onto
//! the buckets, so every series is complete even when most buckets are empty.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::PgExecutor;
use uuid::Uuid;

const WEEKLY_DAYS: i64 = 7;
const YEARLY_SPAN: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl Period {
    /// Unit understood by Postgres `date_trunc`.
    fn grain(self) -> &'static str {
        match self {
            Self::Weekly => "day",
            Self::Monthly => "month",
            Self::Yearly => "year",
        }
    }

    fn label(self, start: NaiveDate) -> String {
        match self {
            Self::Weekly => start.format("%a").to_string(),
            Self::Monthly => start.format("%b").to_string(),
            Self::Yearly => start.format("%Y").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub start: NaiveDate,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Window {
    buckets: Vec<Bucket>,
}

impl Window {
    pub fn new(period: Period, today: NaiveDate) -> Self {
        let starts: Vec<NaiveDate> = match period {
            Period::Weekly => (0..WEEKLY_DAYS)
                .rev()
                .map(|back| today - Duration::days(back))
                .collect(),
            Period::Monthly => (1..=12)
                .filter_map(|month| NaiveDate::from_ymd_opt(today.year(), month, 1))
                .collect(),
            Period::Yearly => (0..YEARLY_SPAN)
                .rev()
                .filter_map(|back| NaiveDate::from_ymd_opt(today.year() - back, 1, 1))
                .collect(),
        };

        let buckets = starts
            .into_iter()
            .map(|start| Bucket {
                start,
                label: period.label(start),
            })
            .collect();

        Self { buckets }
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Midnight UTC of the oldest bucket.
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.buckets
            .first()
            .map(|bucket| Utc.from_utc_datetime(&bucket.start.and_time(NaiveTime::MIN)))
    }

    /// The window with every bucket at zero.
    pub fn zeroed(&self) -> SalesSeries {
        self.fill(std::iter::empty::<(NaiveDate, Decimal)>())
    }

    /// Aligns per-bucket totals onto the window. Totals keyed by a date that
    /// is not a bucket start are dropped; repeated keys are summed.
    pub fn fill<I>(&self, totals: I) -> SalesSeries
    where
        I: IntoIterator<Item = (NaiveDate, Decimal)>,
    {
        let mut by_start: HashMap<NaiveDate, Decimal> = HashMap::new();
        for (start, amount) in totals {
            *by_start.entry(start).or_insert(Decimal::ZERO) += amount;
        }

        let (labels, data) = self
            .buckets
            .iter()
            .map(|bucket| {
                let total = by_start.get(&bucket.start).copied().unwrap_or(Decimal::ZERO);
                (bucket.label.clone(), total)
            })
            .unzip();

        SalesSeries { labels, data }
    }
}

/// Chart payload: `labels[i]` names the bucket whose total is `data[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSeries {
    pub labels: Vec<String>,
    #[serde(serialize_with = "decimals_as_numbers")]
    pub data: Vec<Decimal>,
}

fn decimals_as_numbers<S>(values: &[Decimal], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(values.iter().map(|value| value.to_f64().unwrap_or(0.0)))
}

/// Sums the owner's sales per bucket of `period` ending at `now`.
///
/// Sales whose item was deleted have no owner and are never counted.
pub async fn aggregate<'e, E>(
    executor: E,
    user_id: Uuid,
    period: Period,
    now: DateTime<Utc>,
) -> Result<SalesSeries, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let window = Window::new(period, now.date_naive());
    let Some(starts_at) = window.starts_at() else {
        return Ok(window.zeroed());
    };
    let bucket_starts: Vec<NaiveDate> = window.buckets().iter().map(|b| b.start).collect();

    let totals: Vec<(NaiveDate, Decimal)> = sqlx::query_as(
        r#"
        SELECT
            date_trunc($2, t.created_at AT TIME ZONE 'UTC')::date AS bucket,
            SUM(t.amount) AS total
        FROM transactions t
        JOIN items i ON i.id = t.item_id
        WHERE i.user_id = $1
          AND t.created_at >= $3
          AND date_trunc($2, t.created_at AT TIME ZONE 'UTC')::date = ANY($4)
        GROUP BY bucket
        ORDER BY bucket
        "#,
    )
    .bind(user_id)
    .bind(period.grain())
    .bind(starts_at)
    .bind(&bucket_starts)
    .fetch_all(executor)
    .await?;

    log::debug!(
        "aggregated {} {:?} buckets with sales for user {}",
        totals.len(),
        period,
        user_id
    );

    Ok(window.fill(totals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{create_user, insert_item, insert_sale_at};
    use sqlx::PgPool;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn labels(window: &Window) -> Vec<&str> {
        window.buckets().iter().map(|b| b.label.as_str()).collect()
    }

    #[test]
    fn bucket_counts_match_period() {
        let today = date(2024, 3, 10);
        for (period, expected) in [(Period::Weekly, 7), (Period::Monthly, 12), (Period::Yearly, 5)] {
            let series = Window::new(period, today).zeroed();
            assert_eq!(series.labels.len(), expected, "{period:?}");
            assert_eq!(series.data.len(), expected, "{period:?}");
            assert!(series.data.iter().all(|v| v.is_zero()));
        }
    }

    #[test]
    fn weekly_window_ends_today() {
        let window = Window::new(Period::Weekly, date(2024, 3, 10));
        assert_eq!(labels(&window), ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
        assert_eq!(window.buckets()[0].start, date(2024, 3, 4));
        assert_eq!(
            window.starts_at().unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn weekly_sale_lands_on_its_day() {
        let window = Window::new(Period::Weekly, date(2024, 3, 10));
        let series = window.fill([(date(2024, 3, 8), Decimal::new(100, 0))]);

        assert_eq!(series.data[4], Decimal::new(100, 0));
        assert_eq!(series.data.iter().filter(|v| !v.is_zero()).count(), 1);
    }

    #[test]
    fn weekly_window_crosses_month_boundary() {
        let window = Window::new(Period::Weekly, date(2024, 3, 2));
        assert_eq!(window.buckets()[0].start, date(2024, 2, 25));
        assert_eq!(window.buckets()[4].start, date(2024, 2, 29));
    }

    #[test]
    fn monthly_covers_the_calendar_year() {
        let window = Window::new(Period::Monthly, date(2024, 7, 19));
        assert_eq!(labels(&window)[0], "Jan");
        assert_eq!(labels(&window)[11], "Dec");

        let series = window.fill([
            (date(2024, 3, 1), Decimal::new(10000, 2)),
            (date(2024, 3, 1), Decimal::new(15000, 2)),
        ]);
        assert_eq!(series.data[2], Decimal::new(250, 0));
        assert!(series
            .data
            .iter()
            .enumerate()
            .all(|(i, v)| i == 2 || v.is_zero()));
    }

    #[test]
    fn yearly_spans_five_years_oldest_first() {
        let window = Window::new(Period::Yearly, date(2024, 3, 10));
        assert_eq!(labels(&window), ["2020", "2021", "2022", "2023", "2024"]);
    }

    #[test]
    fn totals_outside_the_window_are_ignored() {
        let window = Window::new(Period::Yearly, date(2024, 3, 10));
        let series = window.fill([
            (date(2019, 1, 1), Decimal::new(5, 0)),
            (date(2022, 1, 1), Decimal::new(7, 0)),
        ]);
        assert_eq!(series.data, [0i32, 0, 7, 0, 0].map(Decimal::from).to_vec());
    }

    #[test]
    fn series_serialises_amounts_as_numbers() {
        let window = Window::new(Period::Weekly, date(2024, 3, 10));
        let series = window.fill([(date(2024, 3, 10), Decimal::new(1250, 2))]);
        let json = serde_json::to_value(&series).unwrap();

        assert_eq!(json["labels"][6], "Sun");
        assert_eq!(json["data"][6], 12.5);
        assert_eq!(json["data"][0], 0.0);
    }

    #[test]
    fn period_defaults_to_monthly() {
        assert_eq!(Period::default(), Period::Monthly);
        let parsed: Period = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(parsed, Period::Weekly);
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn users_only_see_their_own_sales(pool: PgPool) -> sqlx::Result<()> {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 18, 0, 0).unwrap();
        let sale_day = Utc.with_ymd_and_hms(2024, 3, 8, 9, 30, 0).unwrap();

        let alice = create_user(&pool, "alice@example.com").await?;
        let bob = create_user(&pool, "bob@example.com").await?;
        let alices_item = insert_item(&pool, alice, Some("1")).await?;
        let bobs_item = insert_item(&pool, bob, Some("1")).await?;
        insert_sale_at(&pool, alices_item, Decimal::new(100, 0), sale_day).await?;
        insert_sale_at(&pool, bobs_item, Decimal::new(40, 0), sale_day).await?;
        insert_sale_at(&pool, bobs_item, Decimal::new(2, 0), sale_day).await?;

        let alices = aggregate(&pool, alice, Period::Weekly, now).await?;
        let bobs = aggregate(&pool, bob, Period::Weekly, now).await?;

        assert_eq!(alices.data[4], Decimal::new(100, 0));
        assert_eq!(bobs.data[4], Decimal::new(42, 0));
        assert_eq!(alices.data.iter().filter(|v| !v.is_zero()).count(), 1);
        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn orphaned_and_out_of_window_sales_are_excluded(pool: PgPool) -> sqlx::Result<()> {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let user = create_user(&pool, "monthly@example.com").await?;
        let item = insert_item(&pool, user, Some("1")).await?;
        let doomed = insert_item(&pool, user, Some("2")).await?;

        insert_sale_at(&pool, item, Decimal::new(200, 0), Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()).await?;
        insert_sale_at(&pool, item, Decimal::new(50, 0), Utc.with_ymd_and_hms(2024, 3, 31, 23, 59, 59).unwrap()).await?;
        insert_sale_at(&pool, item, Decimal::new(999, 0), Utc.with_ymd_and_hms(2023, 3, 15, 0, 0, 0).unwrap()).await?;
        insert_sale_at(&pool, doomed, Decimal::new(70, 0), Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap()).await?;
        sqlx::query("DELETE FROM items WHERE id = $1").bind(doomed).execute(&pool).await?;

        let series = aggregate(&pool, user, Period::Monthly, now).await?;
        assert_eq!(series.data[2], Decimal::new(250, 0));
        assert!(series.data.iter().enumerate().all(|(i, v)| i == 2 || v.is_zero()));

        let yearly = aggregate(&pool, user, Period::Yearly, now).await?;
        assert_eq!(yearly.data[3], Decimal::new(999, 0));
        assert_eq!(yearly.data[4], Decimal::new(250, 0));
        Ok(())
    }
}
