use crate::post::Post;

pub mod list_renderer;
pub mod page_meta;
pub mod post_renderer;
pub mod redirect_renderer;

#[derive(ramhorns::Content, Debug, Clone, PartialEq)]
pub struct Figure {
    pub src: String,
    pub alt: String,
}

impl Figure {
    /// Image chrome for a post; `None` when the post has no image.
    pub fn for_post(post: &Post) -> Option<Figure> {
        post.image.as_ref().map(|src| Figure {
            src: src.clone(),
            alt: if post.title.is_empty() { "Imagen del post".to_string() } else { post.title.clone() },
        })
    }
}
