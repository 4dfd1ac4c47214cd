//! The group page: balance, members, pony-up tiles, forms for recording
//! transactions and inviting people, and the transaction history.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{User, UserID},
    balance::{CounterpartyTotal, balance, pending_totals},
    endpoints::{self, format_endpoint},
    group::{
        core::{Group, GroupID, get_group},
        membership::{Member, Role, get_members, is_member},
    },
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
        format_dollars, loading_spinner,
    },
    navigation::NavBar,
    transaction::{Transaction, TransactionKind, TransactionStatus, get_transactions_for_group},
};

/// The state needed to display a group page.
#[derive(Debug, Clone)]
pub struct GroupPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GroupPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn balance_view(viewer_balance: f64) -> Markup {
    let color = if viewer_balance < 0.0 {
        "text-red-600 dark:text-red-400"
    } else {
        "text-green-600 dark:text-green-400"
    };

    html! {
        div class="py-4 text-center"
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { "Your balance" }
            p class=({ format!("text-4xl font-bold {color}") }) { (format_dollars(viewer_balance)) }
        }
    }
}

fn pony_up_view(
    group_id: GroupID,
    totals: &[CounterpartyTotal],
    users_by_id: &HashMap<UserID, &User>,
) -> Markup {
    html! {
        @if !totals.is_empty() {
            h2 class="text-lg font-bold py-2" { "You owe" }

            div class="w-full space-y-2"
            {
                @for total in totals {
                    @let name = users_by_id
                        .get(&total.paid_by)
                        .map(|user| user.full_name())
                        .unwrap_or_else(|| format!("User {}", total.paid_by));
                    @let settle_url = format_endpoint(
                        &format_endpoint(endpoints::SETTLE_API, group_id),
                        total.paid_by,
                    );

                    div class="flex items-center justify-between gap-4 p-3 rounded border \
                        border-gray-200 dark:border-gray-700"
                    {
                        span { (name) ": " (format_dollars(total.total)) }

                        button
                            hx-post=(settle_url)
                            hx-target-error="#alert-container"
                            class="px-4 py-2 bg-blue-500 dark:bg-blue-600 \
                            hover:bg-blue-600 hover:dark:bg-blue-700 text-white rounded"
                        {
                            "Pony Up"
                        }
                    }
                }
            }
        }
    }
}

fn members_view(members: &[Member]) -> Markup {
    html! {
        h2 class="text-lg font-bold py-2" { "Members" }

        ul class="w-full space-y-2"
        {
            @for member in members {
                li class="flex items-center gap-3"
                {
                    span
                        class="flex items-center justify-center w-8 h-8 rounded-full \
                        bg-blue-500 text-white text-sm font-semibold"
                    {
                        (member.user.initials())
                    }

                    span { (member.user.full_name()) }

                    @if member.role == Role::Admin {
                        span class="text-xs text-gray-500 dark:text-gray-400" { "admin" }
                    }
                }
            }
        }
    }
}

fn new_transaction_form_view(group_id: GroupID, members: &[Member]) -> Markup {
    let transactions_url = format_endpoint(endpoints::TRANSACTIONS_API, group_id);

    html! {
        h2 class="text-lg font-bold py-2" { "Record a transaction" }

        form
            hx-post=(transactions_url)
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#transaction-submit"
            class="w-full space-y-4"
        {
            div
            {
                label for="kind" class=(FORM_LABEL_STYLE) { "I want to" }

                select id="kind" name="kind" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="charge" { "Charge someone" }
                    option value="pay" { "Pay someone" }
                }
            }

            div
            {
                label for="recipient_email" class=(FORM_LABEL_STYLE) { "Their email" }

                input
                    id="recipient_email"
                    type="email"
                    name="recipient_email"
                    list="member-emails"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                datalist id="member-emails"
                {
                    @for member in members {
                        option value=(member.user.email) {}
                    }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    id="amount"
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    id="description"
                    type="text"
                    name="description"
                    placeholder="Groceries"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" id="transaction-submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" { (loading_spinner()) }
                "Save"
            }
        }
    }
}

fn invite_view(group_id: GroupID) -> Markup {
    let invites_url = format_endpoint(endpoints::INVITES_API, group_id);
    let sms_invites_url = format_endpoint(endpoints::SMS_INVITES_API, group_id);

    html! {
        h2 class="text-lg font-bold py-2" { "Invite people" }

        button
            hx-post=(invites_url)
            hx-target="#invite-link"
            hx-target-error="#alert-container"
            class=(BUTTON_SECONDARY_STYLE)
        {
            "Create invite link"
        }

        div id="invite-link" class="w-full" {}

        form
            hx-post=(sms_invites_url)
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            class="w-full space-y-2 pt-2"
        {
            label for="phone_numbers" class=(FORM_LABEL_STYLE)
            {
                "Or text invite links (comma separated numbers)"
            }

            input
                id="phone_numbers"
                type="text"
                name="phone_numbers"
                placeholder="+64211234567, +64219876543"
                required
                class=(FORM_TEXT_INPUT_STYLE);

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Send SMS invites" }
        }
    }
}

fn transactions_view(transactions: &[Transaction], users_by_id: &HashMap<UserID, &User>) -> Markup {
    let display_name = |user_id: &UserID| {
        users_by_id
            .get(user_id)
            .map(|user| user.full_name())
            .unwrap_or_else(|| format!("User {user_id}"))
    };

    html! {
        h2 class="text-lg font-bold py-2" { "Transactions" }

        @if transactions.is_empty() {
            p class="text-gray-500 dark:text-gray-400" { "No transactions yet." }
        } @else {
            table class="w-full text-sm text-left"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th class=(TABLE_CELL_STYLE) { "Date" }
                        th class=(TABLE_CELL_STYLE) { "Description" }
                        th class=(TABLE_CELL_STYLE) { "Who" }
                        th class=(TABLE_CELL_STYLE) { "Amount" }
                        th class=(TABLE_CELL_STYLE) { "Status" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        @let direction = match transaction.kind {
                            TransactionKind::Pay => "paid",
                            TransactionKind::Charge => "charged",
                        };

                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (transaction.created_at.date()) }
                            td class=(TABLE_CELL_STYLE) { (transaction.description) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (display_name(&transaction.paid_by))
                                " " (direction) " "
                                (display_name(&transaction.owed_by))
                            }
                            td class=(TABLE_CELL_STYLE) { (format_dollars(transaction.amount)) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                @match transaction.status {
                                    TransactionStatus::Pending => {
                                        span class="text-yellow-600 dark:text-yellow-400"
                                        {
                                            "pending"
                                        }
                                    }
                                    TransactionStatus::Paid => {
                                        span class="text-green-600 dark:text-green-400" { "paid" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn group_view(
    group: &Group,
    viewer_balance: f64,
    totals: &[CounterpartyTotal],
    members: &[Member],
    transactions: &[Transaction],
) -> Response {
    let nav_bar = NavBar::new("").into_html();
    let users_by_id: HashMap<UserID, &User> = members
        .iter()
        .map(|member| (member.user.id, &member.user))
        .collect();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-xl space-y-6"
            {
                h1 class="text-2xl font-bold py-2" { (group.name) }

                (balance_view(viewer_balance))
                (pony_up_view(group.id, totals, &users_by_id))
                (members_view(members))
                (new_transaction_form_view(group.id, members))
                (invite_view(group.id))
                (transactions_view(transactions, &users_by_id))
            }
        }
    };

    base(&group.name, &content).into_response()
}

/// Display the group page.
///
/// Only members can view a group, anyone else gets the not found page so the
/// response does not reveal whether the group exists.
pub async fn get_group_page(
    State(state): State<GroupPageState>,
    Extension(user_id): Extension<UserID>,
    Path(group_id): Path<i64>,
) -> Response {
    let group_id = GroupID::new(group_id);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let result = (|| {
        let group = get_group(group_id, &connection)?;

        if !is_member(user_id, group_id, &connection)? {
            return Err(Error::NotAMember);
        }

        let members = get_members(group_id, &connection)?;
        let transactions = get_transactions_for_group(group_id, &connection)?;

        Ok((group, members, transactions))
    })();

    match result {
        Ok((group, members, transactions)) => {
            let viewer_balance = balance(&transactions);
            let totals = pending_totals(&transactions, user_id);

            group_view(&group, viewer_balance, &totals, &members, &transactions)
        }
        Err(error) => error.into_response(),
    }
}
