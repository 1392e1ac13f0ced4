#[derive(Clone, Debug, PartialEq)]
pub struct RobotsRule {
    pub user_agent: String,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Robots {
    pub rules: Vec<RobotsRule>,
    pub sitemap: String,
}

fn paths(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Crawl rules: everything public, the dashboard and JSON APIs hidden.
pub fn default_rules(base_url: &str) -> Robots {
    Robots {
        rules: vec![
            RobotsRule {
                user_agent: "*".into(),
                allow: paths(&["/"]),
                disallow: paths(&["/admin/", "/api/", "/_next/", "/admin/dashboard/"]),
            },
            RobotsRule {
                user_agent: "Googlebot".into(),
                allow: paths(&["/"]),
                disallow: paths(&["/admin/", "/api/"]),
            },
        ],
        sitemap: format!("{base_url}/sitemap.xml"),
    }
}

impl Robots {
    /// `robots.txt` body.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            out.push_str(&format!("User-Agent: {}\n", rule.user_agent));
            for a in &rule.allow {
                out.push_str(&format!("Allow: {a}\n"));
            }
            for d in &rule.disallow {
                out.push_str(&format!("Disallow: {d}\n"));
            }
            out.push('\n');
        }
        out.push_str(&format!("Sitemap: {}\n", self.sitemap));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_groups_and_sitemap() {
        let txt = default_rules("https://example.com").render();
        assert!(txt.starts_with("User-Agent: *\nAllow: /\nDisallow: /admin/\n"));
        assert!(txt.contains("Disallow: /_next/\nDisallow: /admin/dashboard/\n\nUser-Agent: Googlebot\n"));
        assert!(txt.ends_with("Sitemap: https://example.com/sitemap.xml\n"));
        assert_eq!(txt.matches("Disallow: /api/").count(), 2);
    }
}
