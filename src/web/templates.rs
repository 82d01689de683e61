//! Server-rendered pages. Templates are compiled into the binary.

use chrono::{Datelike, Utc};
use tera::{Context, Tera};

mod embedded {
    pub const BASE_HTML: &str = include_str!("../../templates/site/base.html");
    pub const INDEX_HTML: &str = include_str!("../../templates/site/index.html");
    pub const ABOUT_HTML: &str = include_str!("../../templates/site/about.html");
    pub const CONTACT_HTML: &str = include_str!("../../templates/site/contact.html");
    pub const NEWSLETTERS_HTML: &str = include_str!("../../templates/site/newsletters.html");
    pub const NEWSLETTER_HTML: &str = include_str!("../../templates/site/newsletter.html");
    pub const UNSUBSCRIBE_HTML: &str = include_str!("../../templates/site/unsubscribe.html");
}

/// Compiled page templates.
pub struct Pages {
    tera: Tera,
}

impl Pages {
    /// Compile the embedded templates. `.html` templates are autoescaped.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("base.html", embedded::BASE_HTML),
            ("index.html", embedded::INDEX_HTML),
            ("about.html", embedded::ABOUT_HTML),
            ("contact.html", embedded::CONTACT_HTML),
            ("newsletters.html", embedded::NEWSLETTERS_HTML),
            ("newsletter.html", embedded::NEWSLETTER_HTML),
            ("unsubscribe.html", embedded::UNSUBSCRIBE_HTML),
        ])?;

        Ok(Self { tera })
    }

    /// Render `name` with `context`, adding the values every page needs.
    pub fn render(&self, name: &str, context: &Context) -> Result<String, tera::Error> {
        let mut context = context.clone();
        context.insert("year", &Utc::now().year());
        self.tera.render(name, &context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Newsletter;
    use chrono::TimeZone;

    #[test]
    fn all_templates_compile() {
        let pages = Pages::new().unwrap();
        for name in ["index.html", "about.html"] {
            let html = pages.render(name, &Context::new()).unwrap();
            assert!(html.contains("RideAware"));
        }
    }

    #[test]
    fn contact_lists_subjects() {
        let pages = Pages::new().unwrap();
        let mut ctx = Context::new();
        ctx.insert("subjects", &crate::filter::VALID_SUBJECTS);
        let html = pages.render("contact.html", &ctx).unwrap();
        assert!(html.contains(r#"<option value="partnership">Partnership</option>"#));
    }

    #[test]
    fn newsletter_body_is_not_escaped_but_subject_is() {
        let pages = Pages::new().unwrap();
        let newsletter = Newsletter {
            id: 7,
            subject: "Spring <update>".into(),
            body: "<p>New routes</p>".into(),
            sent_at: Utc.with_ymd_and_hms(2024, 4, 2, 8, 0, 0).unwrap(),
        };
        let mut ctx = Context::new();
        ctx.insert("newsletter", &newsletter);
        let html = pages.render("newsletter.html", &ctx).unwrap();
        assert!(html.contains("<p>New routes</p>"));
        assert!(html.contains("Spring &lt;update&gt;"));
        assert!(html.contains("April 2, 2024"));
    }

    #[test]
    fn empty_newsletter_list() {
        let pages = Pages::new().unwrap();
        let mut ctx = Context::new();
        ctx.insert("newsletters", &Vec::<Newsletter>::new());
        let html = pages.render("newsletters.html", &ctx).unwrap();
        assert!(html.contains("No newsletters yet."));
    }

    #[test]
    fn unsubscribe_message_is_escaped() {
        let pages = Pages::new().unwrap();
        let mut ctx = Context::new();
        ctx.insert("message", "Email <x> was not found or already unsubscribed");
        let html = pages.render("unsubscribe.html", &ctx).unwrap();
        assert!(html.contains("Email &lt;x&gt; was not found"));
    }
}
