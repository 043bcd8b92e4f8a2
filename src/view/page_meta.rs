use crate::config::Site;
use crate::post::Post;

/// One `<meta>` element: `<meta {attr}="{key}" content="{content}">`.
#[derive(ramhorns::Content, Debug, Clone, PartialEq)]
pub struct MetaTag {
    pub attr: &'static str,
    pub key: &'static str,
    pub content: String,
}

/// Document title plus the description, Open Graph and Twitter tags.
///
/// Rebuilt on every navigation transition and by the static page generator.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub heading: String,
    pub description: String,
    pub url: String,
    pub site_name: String,
    pub image: Option<String>,
    pub og_type: &'static str,
    pub published: Option<String>,
    pub author: Option<String>,
}

impl PageMeta {
    pub fn site_default(site: &Site) -> Self {
        PageMeta {
            title: site.name.clone(),
            heading: site.name.clone(),
            description: site.description.clone(),
            url: site.base_url(),
            site_name: site.name.clone(),
            image: site.default_image.as_ref().map(|img| site.asset_url(img)),
            og_type: "website",
            published: None,
            author: site.author.clone(),
        }
    }

    pub fn for_post(site: &Site, post: &Post) -> Self {
        let image = post.image.as_ref()
            .or(site.default_image.as_ref())
            .map(|img| site.asset_url(img));

        PageMeta {
            title: format!("{} - {}", post.title, site.name),
            heading: post.title.clone(),
            description: post.excerpt.clone(),
            url: site.post_url(&post.slug),
            site_name: site.name.clone(),
            image,
            og_type: "article",
            published: Some(post.date.raw().to_string()),
            author: site.author.clone(),
        }
    }

    pub fn tags(&self) -> Vec<MetaTag> {
        let tag = |attr, key, content: &str| MetaTag { attr, key, content: content.to_string() };

        let mut tags = vec![
            tag("name", "description", &self.description),
            tag("property", "og:type", self.og_type),
            tag("property", "og:title", &self.heading),
            tag("property", "og:description", &self.description),
            tag("property", "og:url", &self.url),
            tag("property", "og:site_name", &self.site_name),
        ];
        if let Some(ref image) = self.image {
            tags.push(tag("property", "og:image", image));
        }
        if let Some(ref published) = self.published {
            tags.push(tag("property", "article:published_time", published));
        }
        if let Some(ref author) = self.author {
            tags.push(tag("property", "article:author", author));
        }

        let card = if self.image.is_some() { "summary_large_image" } else { "summary" };
        tags.push(tag("name", "twitter:card", card));
        tags.push(tag("name", "twitter:title", &self.heading));
        tags.push(tag("name", "twitter:description", &self.description));
        if let Some(ref image) = self.image {
            tags.push(tag("name", "twitter:image", image));
        }
        tags
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.tags().into_iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.content)
    }
}
