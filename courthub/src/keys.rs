/// Key-construction helpers for the Redis document layout.
#[derive(Debug, Clone)]
pub struct KeyContext<'a> {
    pub prefix: &'a str,
    pub service: &'a str,
}

impl<'a> KeyContext<'a> {
    pub fn new(prefix: &'a str, service: &'a str) -> Self {
        Self { prefix, service }
    }

    pub fn entity(&self, collection: &str, entity_id: &str) -> String {
        format!("{}:{}:{}:{}", self.prefix, self.service, collection, entity_id)
    }

    /// Set holding every document id of a collection.
    pub fn members(&self, collection: &str) -> String {
        format!("{}:{}:{}:members", self.prefix, self.service, collection)
    }

    /// Key for reverse reference lookup - finds all documents of a collection
    /// whose `field` points at a specific target document.
    /// Format: prefix:service:collection:rev_rel:field:target_id
    pub fn reverse_reference(&self, collection: &str, field: &str, target_id: &str) -> String {
        format!(
            "{}:{}:{}:rev_rel:{}:{}",
            self.prefix, self.service, collection, field, target_id
        )
    }

    /// Key claimed by the document owning a unique (possibly compound) value.
    pub fn unique(&self, collection: &str, fields: &[&str], values: &[&str]) -> String {
        let kind = if fields.len() > 1 { "unique_compound" } else { "unique" };
        format!(
            "{}:{}:{}:{}:{}:{}",
            self.prefix,
            self.service,
            collection,
            kind,
            fields.join("+"),
            values.join("+")
        )
    }

    /// Glob matching every key owned by this prefix and service.
    pub fn service_pattern(&self) -> String {
        format!("{}:{}:*", self.prefix, self.service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_entity_keys() {
        let ctx = KeyContext::new("courthub", "hub");
        assert_eq!(ctx.entity("posts", "abc"), "courthub:hub:posts:abc");
        assert_eq!(ctx.members("posts"), "courthub:hub:posts:members");
    }

    #[test]
    fn builds_reference_and_unique_keys() {
        let ctx = KeyContext::new("courthub", "hub");
        assert_eq!(
            ctx.reverse_reference("reviews", "equipment", "eq1"),
            "courthub:hub:reviews:rev_rel:equipment:eq1"
        );
        assert_eq!(
            ctx.unique("users", &["email"], &["a@b.co"]),
            "courthub:hub:users:unique:email:a@b.co"
        );
        assert_eq!(
            ctx.unique("reviews", &["user", "equipment"], &["u1", "eq1"]),
            "courthub:hub:reviews:unique_compound:user+equipment:u1+eq1"
        );
    }
}
