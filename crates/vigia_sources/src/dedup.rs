use std::collections::HashMap;

use vigia_core::Article;

/// Collapse one run's batch to a single article per distinct url.
///
/// On a collision the later article's content replaces the earlier one,
/// while the url keeps its first-seen position. Sources are queried in a
/// fixed order, so within a run the last source to report a url wins.
pub fn dedup_by_url(articles: Vec<Article>) -> Vec<Article> {
    let mut unique: Vec<Article> = Vec::with_capacity(articles.len());
    let mut index_by_url: HashMap<String, usize> = HashMap::new();

    for article in articles {
        match index_by_url.get(&article.url) {
            Some(&i) => unique[i] = article,
            None => {
                index_by_url.insert(article.url.clone(), unique.len());
                unique.push(article);
            }
        }
    }

    unique
}
