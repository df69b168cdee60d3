// ── Placeholder content ──
//
// Keeps the listings populated when real content is sparse. Streams and
// reels are synthesized for active shops that have nothing real today,
// driven entirely by `SeededRng` seeded with the calendar day and shop id:
// stable within a day, different the next.
//
// Every synthesized id starts with `MOCK_PREFIX`; mutating code paths
// (likes, reports, reminders, views) refuse such ids.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::model::{Reel, Shop, Stream, StreamStatus};
use crate::rng::{SeededRng, day_seed};

pub const MOCK_PREFIX: &str = "mock-";

pub const MOCK_LIVE_SLOTS: usize = 3;
pub const MOCK_UPCOMING_SLOTS: usize = 4;

const BASE_HOUR: u32 = 9;
const LIVE_SPACING_MIN: i64 = 15;
const UPCOMING_SPACING_MIN: i64 = 60;
const FINISHED_SPACING_MIN: i64 = 90;

const TITLES: &[&str] = &[
    "Liquidación de temporada",
    "Nueva colección en vivo",
    "Ofertas relámpago",
    "Outlet de fin de semana",
    "Presentamos lo nuevo",
    "Descuentos exclusivos",
    "Preguntas y respuestas en vivo",
    "Última oportunidad",
];

const PLATFORMS: &[&str] = &["Instagram", "TikTok", "YouTube", "Facebook"];

pub fn is_mock_id(id: &str) -> bool {
    id.starts_with(MOCK_PREFIX)
}

/// The local calendar day placeholder content is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDay {
    pub day: NaiveDate,
    pub offset: FixedOffset,
}

impl MockDay {
    pub fn new(day: NaiveDate, offset: FixedOffset) -> Self {
        Self { day, offset }
    }

    /// Today in the machine's local timezone.
    pub fn today() -> Self {
        let now = Local::now();
        Self {
            day: now.date_naive(),
            offset: *now.offset(),
        }
    }

    /// 09:00 local on this day, as UTC.
    pub fn base_time(&self) -> DateTime<Utc> {
        let local = self.day.and_time(NaiveTime::MIN) + TimeDelta::hours(i64::from(BASE_HOUR));
        (local - TimeDelta::seconds(i64::from(self.offset.local_minus_utc()))).and_utc()
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        t.with_timezone(&self.offset).date_naive() == self.day
    }
}

/// Status and scheduled time for the `i`-th placeholder stream.
fn stream_slot(i: usize, base: DateTime<Utc>) -> (StreamStatus, DateTime<Utc>) {
    let n = i64::try_from(i).unwrap_or(i64::MAX / 2);
    if i < MOCK_LIVE_SLOTS {
        (
            StreamStatus::Live,
            base + TimeDelta::minutes(LIVE_SPACING_MIN * n),
        )
    } else if i < MOCK_LIVE_SLOTS + MOCK_UPCOMING_SLOTS {
        let j = n - 3;
        (
            StreamStatus::Upcoming,
            base + TimeDelta::minutes(UPCOMING_SPACING_MIN * (j + 1)),
        )
    } else {
        let k = n - 7;
        (
            StreamStatus::Finished,
            base - TimeDelta::minutes(FINISHED_SPACING_MIN * (k + 1)),
        )
    }
}

/// Active shops not in `busy`, in seeded order, each with its generator
/// positioned after the ordering draw.
fn seeded_candidates<'a>(
    shops: &'a [Arc<Shop>],
    busy: &HashSet<&str>,
    day: NaiveDate,
    salt: &str,
) -> Vec<(&'a Arc<Shop>, SeededRng)> {
    let mut keyed: Vec<(f64, &Arc<Shop>, SeededRng)> = shops
        .iter()
        .filter(|shop| shop.is_active() && !busy.contains(shop.id.as_str()))
        .map(|shop| {
            let mut rng = SeededRng::new(&day_seed(day, &format!("{}{salt}", shop.id)));
            (rng.next_f64(), shop, rng)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
    keyed.into_iter().map(|(_, shop, rng)| (shop, rng)).collect()
}

/// Synthesize up to `count` placeholder streams for active shops with no
/// real stream scheduled on `day`.
///
/// The first three go LIVE (15 min apart from 09:00), the next four
/// UPCOMING (hourly after 09:00), the rest FINISHED (90 min apart before
/// 09:00).
pub fn synthesize_streams(
    shops: &[Arc<Shop>],
    real: &[Stream],
    day: &MockDay,
    count: usize,
) -> Vec<Stream> {
    let busy: HashSet<&str> = real
        .iter()
        .filter(|s| !s.is_mock() && day.contains(s.scheduled_at))
        .map(|s| s.shop.id.as_str())
        .collect();
    let base = day.base_time();
    let date = day.day.format("%Y%m%d");

    seeded_candidates(shops, &busy, day.day, "")
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, (shop, mut rng))| {
            let (status, scheduled_at) = stream_slot(i, base);
            let title = TITLES[rng.pick(TITLES.len())];
            let platform = PLATFORMS[rng.pick(PLATFORMS.len())];
            let views = match status {
                StreamStatus::Live => rng.range(40, 900),
                StreamStatus::Upcoming => 0,
                _ => rng.range(120, 2500),
            };
            let likes = rng.range(0, views / 8);

            Stream {
                id: format!("{MOCK_PREFIX}stream-{date}-{}", shop.id),
                shop: Arc::clone(shop),
                title: title.to_owned(),
                platform: Some(platform.to_owned()),
                url: None,
                status,
                scheduled_at,
                is_visible: true,
                views,
                likes,
                report_count: 0,
                extension_count: 0,
            }
        })
        .collect()
}

/// Synthesize up to `count` placeholder reels for active shops without an
/// unexpired real reel. Creation times fall in the eight hours before
/// 09:00 so they stay inside the 24 h window for the whole day.
pub fn synthesize_reels(
    shops: &[Arc<Shop>],
    real: &[Reel],
    day: &MockDay,
    now: DateTime<Utc>,
    count: usize,
) -> Vec<Reel> {
    let busy: HashSet<&str> = real
        .iter()
        .filter(|r| !r.is_mock() && !r.is_expired(now))
        .map(|r| r.shop.id.as_str())
        .collect();
    let base = day.base_time();
    let date = day.day.format("%Y%m%d");

    seeded_candidates(shops, &busy, day.day, "#reel")
        .into_iter()
        .take(count)
        .map(|(shop, mut rng)| {
            let back = i64::try_from(rng.range(0, 8 * 60)).unwrap_or(0);
            let created_at = base - TimeDelta::minutes(back);
            Reel {
                id: format!("{MOCK_PREFIX}reel-{date}-{}", shop.id),
                shop: Arc::clone(shop),
                url: shop.contact.instagram.clone(),
                created_at,
                expires_at: created_at + Reel::ttl(),
                views: rng.range(10, 600),
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{PlanTier, ShopStatus};
    use pretty_assertions::assert_eq;

    fn shop(id: &str, status: ShopStatus) -> Arc<Shop> {
        let mut s = Shop::fallback();
        s.id = id.into();
        s.name = format!("Tienda {id}");
        s.status = Some(status);
        s.plan = PlanTier::Estandar;
        Arc::new(s)
    }

    fn shops(n: usize) -> Vec<Arc<Shop>> {
        (0..n)
            .map(|i| shop(&format!("s{i}"), ShopStatus::Active))
            .collect()
    }

    fn day() -> MockDay {
        MockDay::new(
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            FixedOffset::west_opt(3 * 3600).unwrap(),
        )
    }

    #[test]
    fn base_time_is_nine_local() {
        assert_eq!(
            day().base_time(),
            "2026-10-19T12:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn deterministic_within_a_day() {
        let shops = shops(12);
        let a = synthesize_streams(&shops, &[], &day(), 10);
        let b = synthesize_streams(&shops, &[], &day(), 10);
        assert_eq!(a, b);
    }

    #[test]
    fn changes_across_days() {
        let shops = shops(12);
        let tomorrow = MockDay::new(day().day.succ_opt().unwrap(), day().offset);
        let a: Vec<String> = synthesize_streams(&shops, &[], &day(), 10)
            .into_iter()
            .map(|s| s.shop.id.clone())
            .collect();
        let b: Vec<String> = synthesize_streams(&shops, &[], &tomorrow, 10)
            .into_iter()
            .map(|s| s.shop.id.clone())
            .collect();
        assert_ne!(a, b);
    }

    #[test]
    fn slot_allocation_and_spacing() {
        let out = synthesize_streams(&shops(12), &[], &day(), 10);
        let base = day().base_time();
        let statuses: Vec<StreamStatus> = out.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                StreamStatus::Live,
                StreamStatus::Live,
                StreamStatus::Live,
                StreamStatus::Upcoming,
                StreamStatus::Upcoming,
                StreamStatus::Upcoming,
                StreamStatus::Upcoming,
                StreamStatus::Finished,
                StreamStatus::Finished,
                StreamStatus::Finished,
            ]
        );
        assert_eq!(out[1].scheduled_at - out[0].scheduled_at, TimeDelta::minutes(15));
        assert_eq!(out[3].scheduled_at, base + TimeDelta::hours(1));
        assert_eq!(out[6].scheduled_at, base + TimeDelta::hours(4));
        assert_eq!(out[7].scheduled_at, base - TimeDelta::minutes(90));
        assert_eq!(out[9].scheduled_at, base - TimeDelta::minutes(270));
    }

    #[test]
    fn bounded_by_count_and_candidates() {
        assert_eq!(synthesize_streams(&shops(12), &[], &day(), 5).len(), 5);
        assert_eq!(synthesize_streams(&shops(2), &[], &day(), 5).len(), 2);
    }

    #[test]
    fn only_active_shops_without_real_content() {
        let mut all = shops(3);
        all.push(shop("banned", ShopStatus::Banned));
        let real = Stream {
            id: "real-1".into(),
            shop: Arc::clone(&all[0]),
            title: "Real".into(),
            platform: None,
            url: None,
            status: StreamStatus::Upcoming,
            scheduled_at: day().base_time() + TimeDelta::hours(2),
            is_visible: true,
            views: 0,
            likes: 0,
            report_count: 0,
            extension_count: 0,
        };

        let out = synthesize_streams(&all, &[real], &day(), 10);
        let ids: HashSet<&str> = out.iter().map(|s| s.shop.id.as_str()).collect();
        assert_eq!(ids, HashSet::from(["s1", "s2"]));
        assert!(out.iter().all(|s| is_mock_id(&s.id)));
    }

    #[test]
    fn reels_are_live_for_the_day() {
        let out = synthesize_reels(&shops(4), &[], &day(), day().base_time(), 3);
        assert_eq!(out.len(), 3);
        for reel in &out {
            assert!(reel.is_mock());
            assert!(!reel.is_expired(day().base_time() + TimeDelta::hours(14)));
            assert_eq!(reel.expires_at - reel.created_at, TimeDelta::hours(24));
        }
    }
}
