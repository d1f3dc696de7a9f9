//! Test Helpers

use sqlx::query;

use crate::{domain::users::data::NewUser, test::TestContext};

const FAILING_ITEM_FUNCTION_SQL: &str = "
    CREATE FUNCTION reject_faulty_item() RETURNS trigger AS $$
    BEGIN
        IF NEW.product_name = 'Faulty' THEN
            RAISE EXCEPTION 'faulty item';
        END IF;
        RETURN NEW;
    END;
    $$ LANGUAGE plpgsql";

const FAILING_ITEM_TRIGGER_SQL: &str = "
    CREATE TRIGGER reject_faulty_item
    BEFORE INSERT ON order_items
    FOR EACH ROW EXECUTE FUNCTION reject_faulty_item()";

/// A valid user whose email and full name derive from `username`.
pub(crate) fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        full_name: format!("Test {username}"),
    }
}

/// Make inserts of an item named `Faulty` fail inside this test's database.
pub(crate) async fn install_failing_item_trigger(ctx: &TestContext) -> Result<(), sqlx::Error> {
    query(FAILING_ITEM_FUNCTION_SQL)
        .execute(ctx.db.pool())
        .await?;

    query(FAILING_ITEM_TRIGGER_SQL)
        .execute(ctx.db.pool())
        .await?;

    Ok(())
}
