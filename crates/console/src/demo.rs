//! Sample customer inquiries for trying the pipeline end to end

use salesops::display::truncate;

pub struct SampleEmail {
    pub id: &'static str,
    pub title: &'static str,
    pub content: &'static str,
}

impl SampleEmail {
    /// First 80 characters, for the template list
    pub fn preview(&self) -> String {
        truncate(&self.content.replace('\n', " "), 83)
    }
}

pub static SAMPLES: [SampleEmail; 3] = [
    SampleEmail {
        id: "large-order",
        title: "Large Order",
        content: "Hi Sales Team,

I would like to place a large order for our manufacturing facility. These are for our production line expansion:

- 25 Desk TRÄNHOLM 19
- 15 Desk NORDMARK 476
- 10 Desk VIKTSTA 642

Please deliver to:
123 Industrial Boulevard
Business City, USA 67890

Contact: procurement@company.com
Phone: (555) 123-4567

We need these within 2 weeks. Please confirm availability and pricing.

Best regards,
Operations Manager",
    },
    SampleEmail {
        id: "small-order",
        title: "Small Order",
        content: "Hello,

We need 3 professional-grade tools for our workshop:
- Coffee HEMNTORP 601
- Coffee LUNDMARK 201
- Coffee VIKTBERG 211

Please send to:
456 Main Street
Smalltown, USA 12345

Contact: john@workshop.com

Thanks!
John Smith",
    },
    SampleEmail {
        id: "urgent-order",
        title: "Urgent Order",
        content: "Dear Sales Team,

URGENT: We need to place an order for our production line expansion. These are critical for our operations and we need them ASAP.

- 25 Desk TRÄNHOLM 19
- 15 Desk NORDMARK 476
- 10 Desk VIKTSTA 642

Delivery address:
789 Factory Road
Industrial Park, USA 99999

Contact: operations@factory.com
Phone: (555) 987-6543

Please confirm availability and provide expedited shipping options.

Best regards,
Operations Manager",
    },
];

pub fn find(id: &str) -> Option<&'static SampleEmail> {
    SAMPLES.iter().find(|s| s.id == id)
}
