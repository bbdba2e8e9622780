//! Diesel schema for task and user persistence.

diesel::table! {
    /// User accounts.
    users (id) {
        /// User identifier.
        id -> Int8,
        /// E-mail shaped login name, unique.
        #[max_length = 255]
        username -> Varchar,
        /// Encoded password hash.
        #[max_length = 255]
        password_hash -> Varchar,
        /// Role code.
        #[max_length = 1]
        role -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Int8,
        /// Free-form description.
        description -> Text,
        /// Due date.
        deadline -> Date,
        /// Lifecycle state code.
        #[max_length = 2]
        state -> Varchar,
        /// Assigned user, cleared when the user is deleted.
        assignee_id -> Nullable<Int8>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> users (assignee_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, users);
