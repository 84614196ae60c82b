use crate::catalog::CatalogIndex;
use crate::resolver::{QueryResolver, RecipeMatch, ResolveMode, Resolution};
use crate::utils::sanitize::{single_line, truncate};
use crate::Result;

const INGREDIENTS_WIDTH: usize = 72;
const INSTRUCTIONS_WIDTH: usize = 160;

/// Resolve a query locally and print the outcome
pub fn ask(resolver: &QueryResolver, query: &str, mode: ResolveMode) -> Result<()> {
    let resolution = resolver.resolve(query, mode)?;
    print!("{}", render(&resolution));
    Ok(())
}

/// Print catalog statistics
pub fn stats(catalog: &CatalogIndex) {
    let with_instructions = catalog
        .recipes()
        .iter()
        .filter(|r| r.has_instructions())
        .count();

    println!("Recipes:           {}", catalog.len());
    println!("With instructions: {with_instructions}");
    println!("Vocabulary:        {} tokens", catalog.vocabulary_size());
}

/// Terminal rendering of a resolution
pub fn render(resolution: &Resolution<'_>) -> String {
    match resolution {
        Resolution::SingleRecipe(m) => render_match(None, m),
        Resolution::RankedResults(matches) => {
            let mut out = format!("Found {} recommendations:\n\n", matches.len());
            for (rank, m) in matches.iter().enumerate() {
                out.push_str(&render_match(Some(rank + 1), m));
                out.push('\n');
            }
            out
        }
        other => format!("{}\n", other.message().unwrap_or_default()),
    }
}

fn render_match(rank: Option<usize>, m: &RecipeMatch<'_>) -> String {
    let recipe = m.recipe;
    let mut out = String::new();

    let prefix = rank.map(|r| format!("{r}. ")).unwrap_or_default();
    match m.score {
        Some(score) => out.push_str(&format!("{prefix}{} (score {score:.3})\n", recipe.name)),
        None => out.push_str(&format!("{prefix}{}\n", recipe.name)),
    }

    out.push_str(&format!(
        "   Ingredients: {}\n",
        truncate(&recipe.ingredients, INGREDIENTS_WIDTH)
    ));

    let details: Vec<&str> = [&recipe.diet, &recipe.course, &recipe.state]
        .into_iter()
        .filter_map(|v| v.as_deref())
        .collect();
    if !details.is_empty() {
        out.push_str(&format!("   {}\n", details.join(" | ")));
    }

    out.push_str(&format!(
        "   Recipe: {}\n",
        truncate(&single_line(&recipe.recipe), INSTRUCTIONS_WIDTH)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RawRecipe, Recipe};

    #[test]
    fn test_render_ranked() {
        let recipe = Recipe::from_raw(RawRecipe {
            diet: Some("vegetarian".to_string()),
            state: Some("Maharashtra".to_string()),
            ..RawRecipe::new("Poha", "flattened rice, onion")
        })
        .unwrap();
        let m = RecipeMatch {
            index: 0,
            recipe: &recipe,
            score: Some(0.4567),
        };

        let out = render(&Resolution::RankedResults(vec![m]));
        assert!(out.starts_with("Found 1 recommendations"));
        assert!(out.contains("1. Poha (score 0.457)"));
        assert!(out.contains("vegetarian | Maharashtra"));
        assert!(out.contains("Recipe not available."));
    }

    #[test]
    fn test_render_messages() {
        assert_eq!(
            render(&Resolution::ConversationalReply("Hey!".to_string())),
            "Hey!\n"
        );
        assert!(render(&Resolution::NoMatch).starts_with("Sorry"));
    }
}
