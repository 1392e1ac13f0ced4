use chrono::{DateTime, SecondsFormat, Utc};
use models::{Record, Service, StaffMember};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SitemapEntry {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

const STATIC_PAGES: &[(&str, ChangeFrequency, f32)] = &[
    ("", ChangeFrequency::Weekly, 1.0),
    ("/about", ChangeFrequency::Monthly, 0.8),
    ("/contact", ChangeFrequency::Monthly, 0.8),
    ("/services", ChangeFrequency::Weekly, 0.9),
    ("/staff", ChangeFrequency::Weekly, 0.9),
];

const DETAIL_PRIORITY: f32 = 0.7;

/// Static pages, then one entry per active service and staff member.
/// Services without a usable slug are addressed by id; staff pages only
/// resolve by slug, so members without one are left out.
pub fn build_sitemap(
    base_url: &str,
    services: &[Service],
    staff: &[StaffMember],
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let entry = |path: String, change_frequency, priority| SitemapEntry {
        url: format!("{base_url}{path}"),
        last_modified: now,
        change_frequency,
        priority,
    };

    let mut entries: Vec<SitemapEntry> = STATIC_PAGES
        .iter()
        .map(|(path, freq, prio)| entry(path.to_string(), *freq, *prio))
        .collect();

    for service in services.iter().filter(|s| s.is_active) {
        let slug = service.public_slug();
        let segment = if slug.is_empty() { service.id.clone() } else { slug };
        if segment.is_empty() {
            continue;
        }
        entries.push(entry(format!("/services/{segment}"), ChangeFrequency::Monthly, DETAIL_PRIORITY));
    }
    for member in staff.iter().filter(|m| m.is_active) {
        let slug = member.public_slug();
        if slug.is_empty() {
            continue;
        }
        entries.push(entry(format!("/staff/{slug}"), ChangeFrequency::Monthly, DETAIL_PRIORITY));
    }
    entries
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// sitemaps.org `urlset` document.
pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for e in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&e.url)));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            e.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", e.change_frequency.as_str()));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", e.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const BASE: &str = "https://www.gardenias-healthcare.net";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn static_pages_come_first_with_priorities() {
        let entries = build_sitemap(BASE, &[], &[], now());
        let urls: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                BASE,
                "https://www.gardenias-healthcare.net/about",
                "https://www.gardenias-healthcare.net/contact",
                "https://www.gardenias-healthcare.net/services",
                "https://www.gardenias-healthcare.net/staff",
            ]
        );
        assert_eq!(entries[0].priority, 1.0);
        assert_eq!(entries[3].change_frequency, ChangeFrequency::Weekly);
    }

    #[test]
    fn detail_pages_use_public_slugs() {
        let services = vec![
            Service { id: "s1".into(), name: "Massage Therapy".into(), is_active: true, ..Default::default() },
            Service { id: "s2".into(), name: "Hidden".into(), is_active: false, ..Default::default() },
            Service { id: "s3".into(), name: "针灸".into(), is_active: true, ..Default::default() },
        ];
        let staff = vec![
            StaffMember { id: "m1".into(), name: "Jane Doe".into(), slug: Some("dr-jane".into()), is_active: true, ..Default::default() },
            StaffMember { id: "m2".into(), name: "王医生".into(), is_active: true, ..Default::default() },
        ];
        let entries = build_sitemap(BASE, &services, &staff, now());
        let detail: Vec<&str> = entries[5..].iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            detail,
            vec![
                "https://www.gardenias-healthcare.net/services/massage-therapy",
                "https://www.gardenias-healthcare.net/services/s3",
                "https://www.gardenias-healthcare.net/staff/dr-jane",
            ]
        );
        assert!(entries[5..].iter().all(|e| e.priority == 0.7 && e.change_frequency == ChangeFrequency::Monthly));
    }

    #[test]
    fn renders_xml() {
        let xml = render_sitemap(&build_sitemap(BASE, &[], &[], now()));
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<loc>https://www.gardenias-healthcare.net/about</loc>"));
        assert!(xml.contains("<lastmod>2024-05-01T12:00:00Z</lastmod>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert_eq!(xml.matches("<url>").count(), 5);
    }

    #[test]
    fn escapes_locations() {
        assert_eq!(xml_escape("a&b<c>"), "a&amp;b&lt;c&gt;");
    }
}
