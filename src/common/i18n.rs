// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::LazyLock;

pub const DEFAULT_LANGUAGE: &str = "en";

// Catálogos embutidos no binário: { "chave": "mensagem com {parametros}" }
const CATALOGS: [(&str, &str); 3] = [
    ("en", include_str!("../../locales/en.json")),
    ("pt", include_str!("../../locales/pt.json")),
    ("ru", include_str!("../../locales/ru.json")),
];

static SHARED: LazyLock<I18nStore> = LazyLock::new(|| {
    I18nStore::from_catalogs(&CATALOGS).unwrap_or_else(|e| {
        tracing::error!("🔥 Catálogo de mensagens inválido: {}", e);
        I18nStore::default()
    })
});

/// Mensagens de erro traduzidas, indexadas por idioma e chave.
#[derive(Debug, Default)]
pub struct I18nStore {
    messages: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    /// Instância única com os catálogos embutidos.
    pub fn shared() -> &'static I18nStore {
        &SHARED
    }

    pub fn from_catalogs(catalogs: &[(&str, &str)]) -> Result<Self, serde_json::Error> {
        let mut messages = HashMap::new();
        for (lang, raw) in catalogs {
            let catalog: HashMap<String, String> = serde_json::from_str(raw)?;
            messages.insert(lang.to_string(), catalog);
        }
        Ok(Self { messages })
    }

    /// Procura a chave no idioma pedido, depois no padrão; se nada achar, devolve a própria chave.
    pub fn translate(&self, lang: &str, key: &str, params: &[(&str, String)]) -> String {
        let template = self
            .lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANGUAGE, key));

        let Some(template) = template else {
            return key.to_string();
        };

        params.iter().fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&str> {
        self.messages.get(lang)?.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalogs_share_the_same_keys() {
        let store = I18nStore::shared();
        let english = &store.messages["en"];
        for lang in ["pt", "ru"] {
            let other = &store.messages[lang];
            for key in english.keys() {
                assert!(other.contains_key(key), "{lang} sem a chave {key}");
            }
        }
    }

    #[test]
    fn falls_back_to_default_language_then_key() {
        let store = I18nStore::from_catalogs(&[
            ("en", r#"{"greeting": "Hello {name}"}"#),
            ("pt", r#"{}"#),
        ])
        .unwrap();

        assert_eq!(
            store.translate("pt", "greeting", &[("name", "Ana".to_string())]),
            "Hello Ana"
        );
        assert_eq!(store.translate("de", "missing.key", &[]), "missing.key");
    }

    #[test]
    fn substitutes_every_parameter() {
        let store = I18nStore::shared();
        let text = store.translate(
            "pt",
            "ledger.percentage_exceeds_100",
            &[("completionPercentage", "120.00".to_string()), ("finishTypeId", "x".to_string())],
        );
        assert!(text.contains("120.00"), "{text}");
        assert!(!text.contains('{'), "{text}");
    }
}
