//! `billforge delete`: remove a stored document by number.

use anyhow::bail;
use billforge_core::DocType;
use tracing::info;

use crate::state::AppState;

pub async fn execute(
    state: &AppState,
    doc_type: DocType,
    number: &str,
    confirm: bool,
) -> anyhow::Result<()> {
    let session = state.require_session()?;
    if !confirm {
        bail!(
            "Refusing to delete {} {} without --confirm",
            doc_type.label(),
            number
        );
    }

    state.db.documents().delete(doc_type, number).await?;
    info!(user = %session.username(), doc_type = %doc_type, number = %number, "Document deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::create;
    use crate::state::tests::{test_state, PASSWORD};
    use billforge_db::DbError;

    #[tokio::test]
    async fn test_delete_requires_confirm_and_login() {
        let mut state = test_state().await;
        assert!(execute(&state, DocType::Invoice, "DC0001", true).await.is_err());

        state.login_with("admin", PASSWORD).unwrap();
        create::execute(&state, DocType::Invoice, &create::tests::args("DC0001"), "A | 1 | 10")
            .await
            .unwrap();

        assert!(execute(&state, DocType::Invoice, "DC0001", false).await.is_err());
        execute(&state, DocType::Invoice, "DC0001", true).await.unwrap();

        let err = execute(&state, DocType::Invoice, "DC0001", true).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DbError>(),
            Some(DbError::NotFound { .. })
        ));
    }
}
