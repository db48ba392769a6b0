use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptLanguage {
    #[default]
    French,
    English,
}

impl PromptLanguage {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "fr" | "french" => Ok(Self::French),
            "en" | "english" => Ok(Self::English),
            other => Err(AppError::ConfigError {
                message: format!("Unsupported prompt language: {}", other),
            }),
        }
    }
}

/// System instruction for one classification call.
///
/// Known groups and subgroups are listed as precedent so the model keeps the
/// tree consistent across documents.
pub fn build_system_prompt(
    groups: &[String],
    subgroups: &[String],
    language: PromptLanguage,
) -> String {
    let groups = groups.join(", ");
    let subgroups = subgroups.join(", ");

    match language {
        PromptLanguage::French => format!(
            r#"Vous allez recevoir un texte extrait d'un document (image scannée, PDF ou fichier texte). Donnez un nom de fichier en rapport avec ce texte, ainsi que le groupe et le sous-groupe correspondants.
Le nom du fichier doit être court et précis, au format 'nom-du-fichier_date', où la date est une date explicite trouvée dans le texte. Si aucune date n'est trouvée, ou si elle n'est pas plausible, omettez la partie date.
Le format de la date doit être 'AAAA-MM-JJ' (année-mois-jour), 'AAAA-MM' (année-mois) ou 'AAAA' (année).
Le texte peut contenir des erreurs de reconnaissance, tenez-en compte.
Le groupe est une catégorie générale, le sous-groupe une catégorie plus spécifique.
Groupes existants (pour exemple): "{groups}".
Sous-groupes existants (pour exemple): "{subgroups}".
Réutilisez de préférence un groupe et un sous-groupe existants s'ils correspondent bien au texte.
Si aucun groupe ou sous-groupe ne correspond, créez-en un nouveau.
Utilisez exclusivement le français pour le nom des groupes et sous-groupes.
Répondez uniquement avec un objet JSON contenant exactement les clés "filename", "group" et "subgroup": {{ "filename": "nom-du-fichier_date", "group": "groupe", "subgroup": "sous-groupe" }}."#
        ),
        PromptLanguage::English => format!(
            r#"You will receive text extracted from a document (scanned image, PDF or plain text file). Derive a filename that describes this text, plus the group and subgroup it belongs to.
The filename must be short and precise, in the form 'name-of-file_date', where the date is an explicit date found in the text. If no date is found, or it is not plausible, leave the date part out.
The date format must be 'YYYY-MM-DD', 'YYYY-MM' or 'YYYY'.
The text may contain recognition errors; take them into account.
The group is a general category, the subgroup a more specific one.
Existing groups (as precedent): "{groups}".
Existing subgroups (as precedent): "{subgroups}".
Prefer reusing an existing group and subgroup when they fit the text well.
If no existing group or subgroup fits, create a new one.
Respond only with a JSON object with exactly the keys "filename", "group" and "subgroup": {{ "filename": "name-of-file_date", "group": "group", "subgroup": "subgroup" }}."#
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_taxonomy() {
        let prompt = build_system_prompt(
            &["Finances".to_string(), "Santé".to_string()],
            &["Factures".to_string()],
            PromptLanguage::French,
        );

        assert!(prompt.contains("\"Finances, Santé\""));
        assert!(prompt.contains("\"Factures\""));
        assert!(prompt.contains("AAAA-MM-JJ"));
        assert!(prompt.contains("\"filename\""));
        assert!(prompt.contains("\"subgroup\""));
    }

    #[test]
    fn test_english_prompt_with_empty_taxonomy() {
        let prompt = build_system_prompt(&[], &[], PromptLanguage::English);

        assert!(prompt.contains("Existing groups (as precedent): \"\"."));
        assert!(prompt.contains("YYYY-MM-DD"));
        assert!(prompt.contains("create a new one"));
    }

    #[test]
    fn test_parse_language() {
        assert_eq!(PromptLanguage::parse("FR").unwrap(), PromptLanguage::French);
        assert_eq!(PromptLanguage::parse("en").unwrap(), PromptLanguage::English);
        assert!(PromptLanguage::parse("de").is_err());
    }
}
