//! Canonical sample dataset used to seed an empty catalog.

use crate::faq::NewFaq;
use crate::product::NewProduct;

fn product(
    name: &str,
    description: &str,
    price: f64,
    image: &str,
    category: &str,
    features: &[&str],
) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        description: description.to_string(),
        price,
        image: image.to_string(),
        category: category.to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
    }
}

fn faq(question: &str, answer: &str, category: &str) -> NewFaq {
    NewFaq {
        question: question.to_string(),
        answer: answer.to_string(),
        category: category.to_string(),
    }
}

/// The four showcase products.
pub fn products() -> Vec<NewProduct> {
    vec![
        product(
            "JARVIS AI Assistant",
            "Advanced AI assistant with voice recognition and natural language processing capabilities for seamless human-computer interaction.",
            2999.0,
            "https://images.unsplash.com/photo-1485827404703-89b55fcc595e?w=400&h=300&fit=crop",
            "AI Technology",
            &[
                "Voice Recognition",
                "Natural Language Processing",
                "Smart Home Integration",
                "Real-time Analytics",
                "Cloud Synchronization",
            ],
        ),
        product(
            "Holographic Display Pro",
            "Next-generation holographic display technology for immersive 3D experiences and advanced data visualization.",
            4999.0,
            "https://images.unsplash.com/photo-1518709268805-4e9042af2176?w=400&h=300&fit=crop",
            "Display Technology",
            &[
                "3D Holographic Projection",
                "Touch Interface",
                "Wireless Connectivity",
                "4K Resolution",
                "Multi-angle Viewing",
            ],
        ),
        product(
            "Neural Interface X1",
            "Revolutionary brain-computer interface for direct neural control of devices with medical-grade safety standards.",
            9999.0,
            "https://images.unsplash.com/photo-1559757148-5c350d0d3c56?w=400&h=300&fit=crop",
            "Neural Technology",
            &[
                "Neural Signal Processing",
                "Wireless Data Transfer",
                "Real-time Feedback",
                "Medical Grade Safety",
                "Adaptive Learning",
            ],
        ),
        product(
            "Quantum Processor Core",
            "Ultra-fast quantum processing unit with crystalline architecture for unprecedented computational performance.",
            15999.0,
            "https://images.unsplash.com/photo-1518709268805-4e9042af2176?w=400&h=300&fit=crop",
            "Quantum Computing",
            &[
                "Quantum Entanglement",
                "Superposition Processing",
                "Error Correction",
                "Cryogenic Cooling",
                "Scalable Architecture",
            ],
        ),
    ]
}

/// The six showcase FAQ entries.
pub fn faqs() -> Vec<NewFaq> {
    vec![
        faq(
            "What is QuantumPulse technology?",
            "QuantumPulse is an advanced AI system that combines quantum computing, machine learning, and neural interfaces to create seamless human-computer interaction experiences.",
            "technology",
        ),
        faq(
            "How secure is the neural interface?",
            "Our neural interfaces use military-grade encryption and are FDA approved. All data is processed locally with optional cloud backup using end-to-end encryption.",
            "security",
        ),
        faq(
            "What's the warranty on holographic displays?",
            "All holographic displays come with a 3-year warranty covering hardware defects and software updates. Extended warranty options are available for enterprise customers.",
            "warranty",
        ),
        faq(
            "Can I integrate QuantumPulse with my smart home?",
            "Yes, QuantumPulse is compatible with all major smart home platforms including Alexa, Google Home, Apple HomeKit, and custom IoT solutions.",
            "integration",
        ),
        faq(
            "What are the system requirements?",
            "Minimum requirements include 16GB RAM, dedicated GPU, and high-speed internet connection. Specific requirements vary by product configuration.",
            "technical",
        ),
        faq(
            "Do you offer training and support?",
            "Yes, we provide comprehensive training programs, 24/7 technical support, and dedicated account management for enterprise customers.",
            "support",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Draft;

    #[test]
    fn dataset_has_four_products_and_six_faqs() {
        assert_eq!(products().len(), 4);
        assert_eq!(faqs().len(), 6);
    }

    // Seed data bypasses the request path, so hold it to the same rules.
    #[test]
    fn every_sample_passes_validation() {
        for p in products() {
            let body = serde_json::to_value(&p).unwrap();
            assert_eq!(NewProduct::validate(&body).unwrap(), p);
        }
        for f in faqs() {
            let body = serde_json::to_value(&f).unwrap();
            assert_eq!(NewFaq::validate(&body).unwrap(), f);
        }
    }
}
