use protonorm_descriptor::{MessageDescriptor, SchemaFile};

/// Declaration counts for a schema file, nested declarations included.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStats {
    pub services: usize,
    pub methods: usize,
    pub messages: usize,
    pub fields: usize,
    pub enums: usize,
    pub enum_values: usize,
}

impl SchemaStats {
    pub fn collect(file: &SchemaFile) -> Self {
        let mut stats = Self {
            services: file.services.len(),
            methods: file.services.values().map(|s| s.methods.len()).sum(),
            enums: file.enums.len(),
            enum_values: file.enums.values().map(|e| e.values.len()).sum(),
            ..Self::default()
        };
        for msg in file.messages.values() {
            stats.add_message(msg);
        }
        stats
    }

    fn add_message(&mut self, msg: &MessageDescriptor) {
        self.messages += 1;
        self.fields += msg.fields.len();
        self.enums += msg.nested_enums.len();
        self.enum_values += msg.nested_enums.iter().map(|e| e.values.len()).sum::<usize>();
        for nested in &msg.nested_messages {
            self.add_message(nested);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use protonorm_descriptor::{EnumDescriptor, EnumValueDescriptor};

    #[test]
    fn counts_nested_declarations() {
        let mut inner = MessageDescriptor::new("Inner");
        inner.nested_enums.push(EnumDescriptor {
            name: "Kind".to_string(),
            values: vec![
                EnumValueDescriptor {
                    name: "A".to_string(),
                    number: 0,
                },
                EnumValueDescriptor {
                    name: "B".to_string(),
                    number: 1,
                },
            ],
        });
        let mut outer = MessageDescriptor::new("Outer");
        outer.nested_messages.push(inner);

        let mut file = SchemaFile::default();
        file.add_message(outer);

        let stats = SchemaStats::collect(&file);
        assert_eq!(stats.messages, 2);
        assert_eq!(stats.enums, 1);
        assert_eq!(stats.enum_values, 2);
        assert_eq!(stats.services, 0);
    }
}
