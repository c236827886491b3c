//! Random article picker for the "sorpréndeme" button.

use crate::content::{Category, ContentError, ContentStore, FALLBACK_CATEGORY};
use crate::text::{capitalize_words, html_to_text};
use crate::types::ContentItem;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RandomItem {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub url: String,
}

fn plant_item(plant: &ContentItem, origin: &str) -> RandomItem {
    let title = match plant.primary_category() {
        Some(cat) if !cat.name.is_empty() => format!(
            "{}: {}",
            capitalize_words(&cat.name),
            capitalize_words(&plant.title)
        ),
        _ => capitalize_words(&plant.title),
    };
    let category = plant
        .primary_category()
        .map(|c| c.slug.as_str())
        .unwrap_or(FALLBACK_CATEGORY);
    RandomItem {
        title,
        content: plant.content_html.clone(),
        excerpt: plant.excerpt.clone(),
        url: format!("{origin}/{category}/{}/", plant.slug),
    }
}

fn category_item(category: &Category, origin: &str) -> RandomItem {
    RandomItem {
        title: capitalize_words(&category.name),
        content: category.content.clone().unwrap_or_default(),
        excerpt: category.description.clone(),
        url: format!("{origin}/{}/", category.slug),
    }
}

/// Every plant and category as a candidate, with raw HTML bodies.
pub fn candidates(plants: &[ContentItem], categories: &[Category], origin: &str) -> Vec<RandomItem> {
    plants
        .iter()
        .map(|p| plant_item(p, origin))
        .chain(categories.iter().map(|c| category_item(c, origin)))
        .collect()
}

/// Pick one candidate uniformly and convert its bodies to plain text.
pub fn pick<R: Rng + ?Sized>(candidates: &[RandomItem], rng: &mut R) -> Option<RandomItem> {
    let item = candidates.choose(rng)?;
    Some(RandomItem {
        content: html_to_text(&item.content),
        excerpt: html_to_text(&item.excerpt),
        ..item.clone()
    })
}

/// Random plant or category from the content store.
pub fn random_item(store: &ContentStore, origin: &str) -> Result<Option<RandomItem>, ContentError> {
    let plants = store.plants()?;
    let categories = store.categories()?;
    let all = candidates(&plants, &categories, origin);
    log::debug!("picking from {} random candidates", all.len());
    Ok(pick(&all, &mut rand::thread_rng()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::{ContentType, Term};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const ORIGIN: &str = "https://plantasyflores.online";

    fn post(slug: &str, title: &str, cats: Vec<Term>) -> ContentItem {
        ContentItem {
            id: 1,
            kind: ContentType::Post,
            slug: slug.into(),
            date: String::new(),
            title: title.into(),
            excerpt: "<p>Flor &amp; aroma</p>".into(),
            content_html: "<p>Poda en invierno&nbsp;</p>".into(),
            featured_image: None,
            main_image: None,
            categories: cats,
            tags: vec![],
        }
    }

    #[test]
    fn plant_titles_carry_category() {
        let items = candidates(
            &[post("banksiae", "rosa BANKSIAE", vec![Term::new("rosa", "rosa")])],
            &[],
            ORIGIN,
        );
        assert_eq!(items[0].title, "Rosa: Rosa Banksiae");
        assert_eq!(items[0].url, "https://plantasyflores.online/rosa/banksiae/");
    }

    #[test]
    fn uncategorized_plant_uses_fallback_path() {
        let items = candidates(&[post("suelta", "una planta", vec![])], &[], ORIGIN);
        assert_eq!(items[0].title, "Una Planta");
        assert_eq!(items[0].url, "https://plantasyflores.online/plantas/suelta/");
    }

    #[test]
    fn pick_cleans_html() {
        let items = candidates(&[post("a", "a", vec![])], &[], ORIGIN);
        let mut rng = StdRng::seed_from_u64(7);
        let picked = pick(&items, &mut rng).unwrap();
        assert_eq!(picked.content, "Poda en invierno");
        assert_eq!(picked.excerpt, "Flor & aroma");
    }

    #[test]
    fn empty_candidates_pick_nothing() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pick(&[], &mut rng).is_none());
    }

    #[test]
    fn fixture_store_has_plants_and_categories() {
        let tmp = setup_fixtures();
        let store = ContentStore::new(content_dir(tmp.path()));
        let plants = store.plants().unwrap();
        let categories = store.categories().unwrap();
        let all = candidates(&plants, &categories, ORIGIN);
        assert_eq!(all.len(), plants.len() + categories.len());
        assert!(all.iter().any(|i| i.url == "https://plantasyflores.online/rosa/"));

        let item = random_item(&store, ORIGIN).unwrap().unwrap();
        assert!(item.url.starts_with(ORIGIN));
        assert!(!item.content.contains('<'));
    }
}
