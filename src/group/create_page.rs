//! The page for creating a new group.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
        loading_spinner,
    },
    navigation::NavBar,
};

/// Display the new group form.
pub async fn get_new_group_page() -> Response {
    let nav_bar = NavBar::new(endpoints::NEW_GROUP_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold leading-tight tracking-tight md:text-2xl py-4"
            {
                "Create a group"
            }

            form
                hx-post=(endpoints::GROUPS_API)
                hx-target-error="#alert-container"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="w-full space-y-4 md:space-y-6"
            {
                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Group name" }

                    input
                        id="name"
                        type="text"
                        name="name"
                        placeholder="Ski Trip"
                        minlength="2"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" { (loading_spinner()) }
                    "Create Group"
                }
            }
        }
    };

    base("New Group", &content).into_response()
}
