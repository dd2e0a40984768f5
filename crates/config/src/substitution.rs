//! Environment variable substitution in configuration files

use regex::Regex;
use std::env;
use tracing::{debug, warn};

fn placeholder_pattern() -> Regex {
    Regex::new(r"\$\{(\w+)\}|\$(\w+)").expect("placeholder pattern is valid")
}

/// Expand `${VAR_NAME}` and `$VAR_NAME` placeholders from the environment
///
/// Unset variables are left as-is so the validator can report them with
/// field context instead of failing the parse.
pub fn substitute_env_vars(content: &str) -> String {
    let pattern = placeholder_pattern();
    let mut result = content.to_string();

    for caps in pattern.captures_iter(content) {
        let Some(placeholder) = caps.get(0) else { continue };
        let Some(var_name) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };

        match env::var(var_name.as_str()) {
            Ok(value) => {
                debug!(var = var_name.as_str(), "Substituting environment variable");
                result = result.replace(placeholder.as_str(), &value);
            }
            Err(_) => {
                warn!(var = var_name.as_str(), "Environment variable not set");
            }
        }
    }

    result
}

/// Check whether a string still contains unexpanded placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    placeholder_pattern().is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_braced_form() {
        env::set_var("MESHBOOK_SUBST_BRACED", "hello");
        let result = substitute_env_vars("value: ${MESHBOOK_SUBST_BRACED}");
        env::remove_var("MESHBOOK_SUBST_BRACED");

        assert_eq!(result, "value: hello");
        assert!(!has_unresolved_env_vars(&result));
    }

    #[test]
    fn test_substitutes_bare_form() {
        env::set_var("MESHBOOK_SUBST_BARE", "world");
        let result = substitute_env_vars("value: $MESHBOOK_SUBST_BARE");
        env::remove_var("MESHBOOK_SUBST_BARE");

        assert_eq!(result, "value: world");
    }

    #[test]
    fn test_unset_variables_are_kept() {
        let result = substitute_env_vars("a: ${MESHBOOK_DEFINITELY_UNSET}\nb: $MESHBOOK_ALSO_UNSET");
        assert_eq!(
            result,
            "a: ${MESHBOOK_DEFINITELY_UNSET}\nb: $MESHBOOK_ALSO_UNSET"
        );
        assert!(has_unresolved_env_vars(&result));
    }
}
