// src/common/i18n.rs

use std::collections::HashMap;

pub const DEFAULT_LANG: &str = "en";

// Catálogos embutidos no binário (um JSON chave -> mensagem por idioma)
const CATALOGS: [(&str, &str); 2] = [
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
];

#[derive(Debug, Clone, Default)]
pub struct I18nStore {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn embedded() -> Self {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            match serde_json::from_str::<HashMap<String, String>>(raw) {
                Ok(messages) => {
                    catalogs.insert(lang.to_string(), messages);
                }
                Err(e) => tracing::error!("Catálogo de idioma '{}' inválido: {}", lang, e),
            }
        }
        Self { catalogs }
    }

    /// Resolve a chave no idioma pedido, depois em inglês, e por fim devolve a própria chave.
    /// Placeholders no formato `{nome}` são substituídos pelos parâmetros.
    pub fn translate(&self, lang: &str, key: &str, params: &[(&str, &str)]) -> String {
        let template = self
            .lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANG, key))
            .unwrap_or(key);

        params
            .iter()
            .fold(template.to_string(), |message, (name, value)| {
                message.replace(&format!("{{{}}}", name), value)
            })
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.catalogs
            .get(lang)
            .and_then(|messages| messages.get(key))
            .map(String::as_str)
    }
}
