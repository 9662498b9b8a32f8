// src/services/moderation.rs

use std::{io, path::Path};

/// Lista de termos proibidos, carregada uma vez na inicialização e
/// compartilhada somente-leitura (via `Arc`) pelo resto do processo.
///
/// A checagem é por substring, sem fronteira de palavra: um termo embutido
/// em outra palavra também marca o texto.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    terms: Vec<String>,
}

impl Blocklist {
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<String> = terms
            .into_iter()
            .map(|term| term.as_ref().trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();
        terms.sort();
        terms.dedup();
        Self { terms }
    }

    // Um termo por linha; linhas vazias são ignoradas
    pub fn parse(contents: &str) -> Self {
        Self::from_terms(contents.lines())
    }

    /// Arquivo ausente não impede a subida: o filtro fica vazio e avisamos no log.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let blocklist = Self::parse(&contents);
                tracing::info!("🛡️ Blocklist carregada: {} termos de {}", blocklist.len(), path.display());
                Ok(blocklist)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("Blocklist {} não encontrada; filtro de conteúdo desativado.", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!("Falha ao ler a blocklist {}: {}", path.display(), e)),
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn contains_flagged_content(&self, text: Option<&str>) -> bool {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            return false;
        };
        let text_lower = text.to_lowercase();
        self.terms.iter().any(|term| text_lower.contains(term.as_str()))
    }
}

pub fn contains_flagged_content(text: Option<&str>, blocklist: &Blocklist) -> bool {
    blocklist.contains_flagged_content(text)
}
