//! Command-line interface definitions for the annex pipeline.
//!
//! All options can be provided via command-line flags or environment
//! variables. The archive tag exists so the output name never depends on the
//! invoking user's account.

use clap::Parser;

/// Publication page listing the procedure-list update annexes.
pub const DEFAULT_PAGE_URL: &str = "https://www.gov.br/ans/pt-br/acesso-a-informacao/participacao-da-sociedade/atualizacao-do-rol-de-procedimentos";

/// Command-line arguments for the annex pipeline.
///
/// # Examples
///
/// ```sh
/// # Defaults: fetch from the ANS page, work in the current directory
/// rol_anexos
///
/// # Custom working directory and archive tag
/// rol_anexos -w ./out -t equipe3
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Publication page to scan for PDF annex links
    #[arg(short, long, env = "ROL_PAGE_URL", default_value = DEFAULT_PAGE_URL)]
    pub page_url: String,

    /// Directory for downloaded PDFs, the intermediate CSV, and the archive
    #[arg(short, long, env = "ROL_WORK_DIR", default_value = ".")]
    pub work_dir: String,

    /// Suffix for the output archive name (`Teste_<tag>.gz`)
    #[arg(short = 't', long, env = "ROL_ARCHIVE_TAG", default_value = "ans")]
    pub archive_tag: String,
}
