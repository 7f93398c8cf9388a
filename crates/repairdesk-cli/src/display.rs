//! Text rendering for the terminal: money, dates, the order table and the
//! detail card.

use std::fmt::{self, Display};

use chrono::{DateTime, TimeZone};

use repairdesk::{Order, Stats, Status};

/// Placeholder shown for a missing region or phone.
pub const NONE_MARK: &str = "—";

/// Format an amount in rubles: thousands grouped with a no-break space,
/// at most two fraction digits after a comma, trailing zeros dropped.
///
/// `12345.0` becomes `12 345 ₽`, `1500.5` becomes `1 500,5 ₽`.
pub fn money(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative && cents > 0 {
        out.push('-');
    }
    out.push_str(&grouped);
    if frac > 0 {
        let frac = format!("{frac:02}");
        out.push(',');
        out.push_str(frac.trim_end_matches('0'));
    }
    out.push_str(" ₽");
    out
}

/// `dd.mm.yy` in the instant's own time zone.
pub fn date<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format("%d.%m.%y").to_string()
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    let mut out = cell.to_string();
    out.extend(std::iter::repeat(' ').take(width.saturating_sub(len)));
    out
}

/// Render orders as a left-aligned table. `localize` converts stored UTC
/// timestamps to the zone dates are shown in.
pub fn table<Tz, F>(orders: &[&Order], localize: F) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
    F: Fn(&Order) -> DateTime<Tz>,
{
    let header = ["ID", "DATE", "TOOL", "CLIENT", "REGION", "STATUS", "TOTAL"];
    let rows: Vec<[String; 7]> = orders
        .iter()
        .map(|order| {
            let client = match &order.client_phone {
                Some(phone) => format!("{} ({phone})", order.client_name),
                None => order.client_name.clone(),
            };
            [
                order.id.to_string(),
                date(&localize(order)),
                order.tool_name.clone(),
                client,
                order
                    .region
                    .map_or_else(|| NONE_MARK.to_string(), |r| r.name().to_string()),
                order.status.label().to_string(),
                money(order.total()),
            ]
        })
        .collect();

    let mut widths = header.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    out.push_str(&line(header.iter().map(|h| h.to_string()).collect()));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.to_vec()));
        out.push('\n');
    }
    out
}

/// Render one order with its parts and totals.
pub fn card<Tz>(order: &Order, created: &DateTime<Tz>, updated: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    Card {
        order,
        created,
        updated,
    }
    .to_string()
}

struct Card<'a, Tz: TimeZone> {
    order: &'a Order,
    created: &'a DateTime<Tz>,
    updated: &'a DateTime<Tz>,
}

impl<Tz> Display for Card<'_, Tz>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = self.order;
        writeln!(f, "Order {}", order.id)?;
        writeln!(f, "  Tool:     {}", order.tool_name)?;
        writeln!(f, "  Client:   {}", order.client_name)?;
        writeln!(f, "  Phone:    {}", order.client_phone.as_deref().unwrap_or(NONE_MARK))?;
        writeln!(f, "  Region:   {}", order.region.map_or(NONE_MARK, |r| r.name()))?;
        writeln!(f, "  Status:   {}", order.status.label())?;
        writeln!(f, "  Created:  {}", self.created.format("%d.%m.%y %H:%M"))?;
        writeln!(f, "  Updated:  {}", self.updated.format("%d.%m.%y %H:%M"))?;
        if !order.comment.is_empty() {
            writeln!(f, "  Comment:  {}", order.comment)?;
        }

        if order.parts.is_empty() {
            writeln!(f, "  Parts:    {NONE_MARK}")?;
        } else {
            writeln!(f, "  Parts:")?;
            for part in &order.parts {
                writeln!(
                    f,
                    "    - {} × {} @ {} = {}",
                    part.name,
                    part.quantity,
                    money(part.price),
                    money(part.line_total())
                )?;
            }
        }
        writeln!(f, "  Parts total: {}", money(order.parts_total()))?;
        writeln!(f, "  Labor:       {}", money(order.labor_price))?;
        writeln!(f, "  Total:       {}", money(order.total()))
    }
}

/// One line per counter, in dashboard order.
pub fn stats(stats: &Stats) -> String {
    StatsBlock(stats).to_string()
}

struct StatsBlock<'a>(&'a Stats);

impl Display for StatsBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.0;
        writeln!(f, "Всего:     {}", stats.total)?;
        for status in Status::ALL {
            let label = format!("{}:", status.label());
            writeln!(f, "{label:<10} {}", stats.count(status))?;
        }
        writeln!(f, "Выручка:   {}", money(stats.revenue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use repairdesk::{OrderDraft, OrderId, Region};

    fn sample() -> Order {
        let draft = OrderDraft::new("Drill", "Ivanov")
            .phone("+7 900")
            .region(Region::Moscow)
            .labor_price(500.0)
            .part("Carbon brush", 100.0, 2);
        let created = Utc.with_ymd_and_hms(2024, 3, 7, 10, 30, 0).unwrap();
        Order::from_draft(OrderId::new("abc"), draft, created)
    }

    #[test]
    fn test_money_groups_thousands() {
        assert_eq!(money(0.0), "0 ₽");
        assert_eq!(money(700.0), "700 ₽");
        assert_eq!(money(12345.0), "12\u{a0}345 ₽");
        assert_eq!(money(1_234_567.0), "1\u{a0}234\u{a0}567 ₽");
    }

    #[test]
    fn test_money_fraction_uses_comma() {
        assert_eq!(money(1500.5), "1\u{a0}500,5 ₽");
        assert_eq!(money(99.99), "99,99 ₽");
        assert_eq!(money(10.004), "10 ₽");
        assert_eq!(money(-250.0), "-250 ₽");
    }

    #[test]
    fn test_date_is_day_month_short_year() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 0).unwrap();
        assert_eq!(date(&at), "07.03.24");
    }

    #[test]
    fn test_table_has_header_and_one_row_per_order() {
        let order = sample();
        let mut bare = sample();
        bare.id = OrderId::new("xyz");
        bare.client_phone = None;
        bare.region = None;

        let rendered = table(&[&order, &bare], |o| o.created_at);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("Ivanov (+7 900)"));
        assert!(lines[1].contains("Москва"));
        assert!(lines[1].contains("Принят"));
        assert!(lines[1].contains("07.03.24"));
        assert!(lines[1].ends_with("700 ₽"));
        assert!(lines[2].contains(NONE_MARK));
    }

    #[test]
    fn test_card_lists_parts_and_totals() {
        let order = sample();
        let rendered = card(&order, &order.created_at, &order.updated_at);
        assert!(rendered.contains("Carbon brush × 2 @ 100 ₽ = 200 ₽"));
        assert!(rendered.contains("Parts total: 200 ₽"));
        assert!(rendered.contains("Total:       700 ₽"));
        assert!(!rendered.contains("Comment"));
    }

    #[test]
    fn test_stats_lists_every_status() {
        let orders = vec![sample()];
        let rendered = stats(&repairdesk::core::stats(&orders));
        for status in Status::ALL {
            assert!(rendered.contains(status.label()));
        }
        assert!(rendered.contains("Выручка:   700 ₽"));
    }
}
