//! Esquema Diesel (escrito a mano). Reemplazable con `diesel print-schema`.

diesel::table! {
    workflow_instance (instance_id) {
        instance_id -> Uuid,
        definition_id -> Text,
        definition_hash -> Text,
        current_node -> BigInt,
        status -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    workflow_process (seq) {
        seq -> BigInt,
        instance_id -> Uuid,
        rnid -> Text,
        from_node -> BigInt,
        to_node -> BigInt,
        tid -> Text,
        node_type -> Text,
        actor_id -> BigInt,
        data -> Jsonb,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(workflow_process -> workflow_instance (instance_id));

diesel::allow_tables_to_appear_in_same_query!(workflow_instance, workflow_process,);
