use foliobase::chat::{classify, EditIntent};
use foliobase::portfolio::{ItemKind, ScalarField};

#[test]
fn show_requests_win_over_everything_else() {
    assert_eq!(classify("show my portfolio"), EditIntent::ShowSummary);
    assert_eq!(classify("display the current bio"), EditIntent::ShowSummary);
    assert_eq!(
        classify("view my projects please"),
        EditIntent::ShowSummary,
        "show words outrank field keywords"
    );
}

#[test]
fn field_updates_need_both_keyword_and_verb() {
    assert_eq!(
        classify("update my bio to mention rust"),
        EditIntent::UpdateField(ScalarField::Bio)
    );
    assert_eq!(
        classify("change the headline"),
        EditIntent::UpdateField(ScalarField::Headline)
    );
    assert_eq!(
        classify("set my title to founding engineer"),
        EditIntent::UpdateField(ScalarField::Title)
    );
    assert_eq!(
        classify("my bio is quite long"),
        EditIntent::GeneralQuery,
        "a field keyword without an update verb is not an edit"
    );
}

#[test]
fn email_mentions_route_to_email_updates() {
    assert_eq!(
        classify("change my email to jordan@avery.studio"),
        EditIntent::UpdateEmail
    );
    assert_eq!(classify("what is my email again"), EditIntent::UpdateEmail);
}

#[test]
fn additions_need_an_add_word() {
    assert_eq!(
        classify("add a project about my new cli"),
        EditIntent::AddItem(ItemKind::Projects)
    );
    assert_eq!(
        classify("please add a service for consulting"),
        EditIntent::AddItem(ItemKind::Services)
    );
    assert_eq!(
        classify("I like this project"),
        EditIntent::GeneralQuery,
        "mentioning a project is not adding one"
    );
    assert_eq!(
        classify("please create a project for my blog"),
        EditIntent::GeneralQuery,
        "only the word 'add' triggers an addition"
    );
}

#[test]
fn removals_capture_a_lowercased_hint() {
    assert_eq!(
        classify("remove project 'Alpha Tracker'"),
        EditIntent::RemoveItem {
            kind: ItemKind::Projects,
            hint: "alpha tracker".to_string(),
        }
    );
    assert_eq!(
        classify("remove the Consulting service"),
        EditIntent::RemoveItem {
            kind: ItemKind::Services,
            hint: "the consulting service".to_string(),
        }
    );
}

#[test]
fn quoted_hints_lose_their_quotes() {
    assert_eq!(
        classify("remove project \"Beta Site\""),
        EditIntent::RemoveItem {
            kind: ItemKind::Projects,
            hint: "beta site".to_string(),
        }
    );
}

#[test]
fn everything_else_is_a_general_query() {
    assert_eq!(
        classify("what do you think of my portfolio site"),
        EditIntent::GeneralQuery
    );
    assert_eq!(classify("hello"), EditIntent::GeneralQuery);
}
