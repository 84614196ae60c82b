use recommender::catalog::{load_catalog, load_index, RECIPE_PLACEHOLDER};
use recommender::config::chat::ChatTable;
use recommender::config::SearchConfig;
use recommender::{Error, QueryResolver, ResolveMode, Resolution};
use std::io::Write;
use std::sync::Arc;

const FIXTURE: &str = "tests/fixtures/indian_food_sample.csv";

fn fixture_resolver() -> QueryResolver {
    let index = load_index(FIXTURE).expect("Failed to load fixture catalog");
    QueryResolver::with_catalog(Arc::new(index), ChatTable::default(), SearchConfig::default())
}

#[test]
fn test_load_fixture_catalog() {
    let rows = load_catalog(FIXTURE).unwrap();
    assert_eq!(rows.len(), 13);

    let index = load_index(FIXTURE).unwrap();
    assert_eq!(index.len(), 13);

    let (_, poha) = index.find_by_name("poha").unwrap();
    assert!(poha.recipe.starts_with("Rinse the poha"));
    assert_eq!(poha.state.as_deref(), Some("Maharashtra"));
    assert_eq!(poha.total_time_minutes(), Some(25));

    let (_, upma) = index.find_by_name("upma").unwrap();
    assert_eq!(upma.recipe, RECIPE_PLACEHOLDER);

    let (_, pani_puri) = index.find_by_name("pani puri").unwrap();
    assert_eq!(pani_puri.state, None);
    assert_eq!(pani_puri.region, None);
}

#[test]
fn test_fixture_self_similarity() {
    let index = load_index(FIXTURE).unwrap();
    for (i, recipe) in index.recipes().iter().enumerate() {
        let v = index.vectorize(&recipe.ingredients);
        let score = v.cosine(index.vector(i).unwrap());
        assert!((score - 1.0).abs() < 1e-5, "{}: {score}", recipe.name);
    }
}

#[test]
fn test_single_best_on_fixture() {
    let resolver = fixture_resolver();

    match resolver
        .resolve("Carrots, milk and sugar", ResolveMode::SingleBest)
        .unwrap()
    {
        Resolution::SingleRecipe(m) => {
            assert_eq!(m.recipe.name, "Gajar ka halwa");
            assert!(m.score.unwrap() >= 0.1);
        }
        other => panic!("expected a single recipe, got {other:?}"),
    }
}

#[test]
fn test_dish_name_wins_over_ingredient_overlap() {
    let resolver = fixture_resolver();

    // "boondi" is an ingredient of Pani puri, but also a dish of its own
    match resolver.resolve("Boondi", ResolveMode::RankedList(5)).unwrap() {
        Resolution::SingleRecipe(m) => assert_eq!(m.recipe.name, "Boondi"),
        other => panic!("expected exact name match, got {other:?}"),
    }
}

#[test]
fn test_ranked_scores_non_increasing() {
    let resolver = fixture_resolver();

    let resolution = resolver
        .resolve("onion mustard seeds curry leaves", ResolveMode::RankedList(5))
        .unwrap();
    let Resolution::RankedResults(matches) = resolution else {
        panic!("expected ranked results");
    };

    assert_eq!(matches.len(), 5);
    for pair in matches.windows(2) {
        let (a, b) = (pair[0].score.unwrap(), pair[1].score.unwrap());
        assert!(a >= b);
        if a == b {
            assert!(pair[0].index < pair[1].index);
        }
    }

    let top: Vec<&str> = matches[..3].iter().map(|m| m.recipe.name.as_str()).collect();
    assert!(top.contains(&"Poha"));
    assert!(top.contains(&"Upma"));
    assert!(top.contains(&"Masala dosa"));
}

#[test]
fn test_catalog_without_required_column() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "title,ingredients").unwrap();
    writeln!(file, "Poha,\"rice, onion\"").unwrap();

    let err = load_index(file.path()).unwrap_err();
    assert!(matches!(err, Error::Catalog(_)));
}

#[test]
fn test_catalog_with_only_header_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "name,ingredients,diet").unwrap();

    let err = load_index(file.path()).unwrap_err();
    assert!(matches!(err, Error::Catalog(_)));
}
