use async_trait::async_trait;

use super::DataSupplier;
use crate::errors::PortalResult;
use crate::models::{FieldDescriptor, Record};

/// In-memory supplier with fixed fields and records
#[derive(Debug, Clone)]
pub struct SampleSupplier {
    name: String,
    fields: Vec<FieldDescriptor>,
    rows: Vec<Record>,
}

impl SampleSupplier {
    pub fn new(name: &str, fields: Vec<FieldDescriptor>, rows: Vec<Record>) -> Self {
        Self {
            name: name.to_string(),
            fields,
            rows,
        }
    }

    pub fn recipients() -> Self {
        let fields = vec![
            FieldDescriptor::new("name", "Recipient Name"),
            FieldDescriptor::new("email", "Email"),
            FieldDescriptor::new("phone", "Phone Number"),
            FieldDescriptor::new("priority", "Priority"),
            FieldDescriptor::new("status", "Status"),
        ];

        let rows = [
            ("Maria Garcia", "maria.g@email.com", "+1 (555) 123-4567", "High", "Pending"),
            ("Robert Chen", "robert.c@email.com", "+1 (555) 234-5678", "Medium", "Active"),
            ("Sarah Johnson", "sarah.j@email.com", "+1 (555) 345-6789", "Low", "Active"),
            ("Ahmed Hassan", "ahmed.h@email.com", "+1 (555) 456-7890", "High", "Urgent"),
        ]
        .into_iter()
        .map(|(name, email, phone, priority, status)| {
            Record::new()
                .with("name", name)
                .with("email", email)
                .with("phone", phone)
                .with("priority", priority)
                .with("status", status)
        })
        .collect();

        Self::new("sample recipients", fields, rows)
    }

    pub fn donors() -> Self {
        let fields = vec![
            FieldDescriptor::new("name", "Donor Name"),
            FieldDescriptor::new("email", "Email"),
            FieldDescriptor::new("amount", "Amount"),
            FieldDescriptor::new("purpose", "Purpose"),
            FieldDescriptor::new("status", "Status"),
        ];

        let rows = [
            ("Emily Carter", "emily.c@email.com", "$500", "General Donation", "Agreement Sent"),
            ("David Kim", "david.k@email.com", "$1,000", "In Memory Of", "Signed"),
            ("Priya Sharma", "priya.s@email.com", "$100", "Birthday Celebration", "Signed"),
            ("Lucas Martin", "lucas.m@email.com", "$250", "Other", "Pending"),
        ]
        .into_iter()
        .map(|(name, email, amount, purpose, status)| {
            Record::new()
                .with("name", name)
                .with("email", email)
                .with("amount", amount)
                .with("purpose", purpose)
                .with("status", status)
        })
        .collect();

        Self::new("sample donors", fields, rows)
    }
}

#[async_trait]
impl DataSupplier for SampleSupplier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_fields(&self) -> PortalResult<Vec<FieldDescriptor>> {
        Ok(self.fields.clone())
    }

    async fn fetch_rows(&self) -> PortalResult<Vec<Record>> {
        Ok(self.rows.clone())
    }
}
