//! Narrative text shown around the charts.

use super::Insight;

pub const DASHBOARD_TITLE: &str = "📡 Análisis del Sector de Telecomunicaciones en Argentina";

pub const HOME_INTRO: &str = "Este proyecto analiza el sector de telecomunicaciones en Argentina \
con datos del ENACOM. El análisis se divide en cuatro áreas:";

pub fn home_areas() -> Vec<Insight> {
    vec![
        Insight::new(
            "1. Penetración del Servicio",
            &["Evaluar qué tan extendido está el servicio de internet en la población y en los hogares."],
        ),
        Insight::new(
            "2. Calidad y Velocidad del Servicio",
            &["Identificar las velocidades promedio y su distribución entre provincias."],
        ),
        Insight::new(
            "3. Tecnologías de Conexión",
            &["Analizar las tecnologías dominantes y su evolución."],
        ),
        Insight::new("4. KPI's", &["Presentación de indicadores clave."]),
    ]
}

pub const PENETRATION_INTRO: &str = "Esta sección analiza qué tan extendido está el servicio de \
internet en la población y en los hogares, a partir de los datasets Penetración-población, \
Penetración-hogares y Penetración-totales.";

pub const POPULATION_CHART_TEXT: &str = "Accesos por cada 100 habitantes en cada provincia. \
Muestra cómo varía la conectividad entre provincias, de las más conectadas a las de menor cobertura.";

pub const HOUSEHOLD_CHART_TEXT: &str = "Accesos por cada 100 hogares en cada provincia para el \
trimestre seleccionado.";

pub const TRENDS_CHART_TEXT: &str = "Evolución de la penetración en hogares y en población a lo \
largo del tiempo.";

pub const HEATMAP_TEXT: &str = "Accesos por cada 100 hogares por provincia y trimestre.";

pub fn penetration_insights() -> Vec<Insight> {
    vec![
        Insight::new(
            "Brechas geográficas persistentes",
            &[
                "Capital Federal, Tierra del Fuego y La Pampa lideran en accesos por habitante y por hogar.",
                "Formosa, Chaco y San Juan quedan rezagadas, reflejo de desigualdades en infraestructura y urbanización.",
            ],
        ),
        Insight::new(
            "Crecimiento sostenido",
            &["La penetración mejora desde 2014; en 2024 ronda 30 accesos cada 100 habitantes y 80 cada 100 hogares."],
        ),
        Insight::new(
            "Hogares frente a habitantes",
            &["Siempre hay más accesos por hogar que por habitante: no todas las personas de un hogar conectado acceden al servicio."],
        ),
        Insight::new(
            "Patrones temporales",
            &["El crecimiento se acelera entre 2019 y 2021, en coincidencia con la mayor demanda durante la pandemia."],
        ),
    ]
}

pub const SPEED_INTRO: &str = "Velocidades promedio de bajada y su distribución entre provincias. \
Las provincias se ordenan por velocidad media.";

pub fn speed_insights() -> Vec<Insight> {
    vec![
        Insight::new(
            "Disparidad en la calidad del servicio",
            &["La velocidad media varía mucho entre provincias; el rango y la desviación estándar se muestran arriba."],
        ),
        Insight::new(
            "Diferencias regionales",
            &[
                "Las provincias más urbanizadas, como Capital Federal y Buenos Aires, lideran gracias a una infraestructura más avanzada.",
                "Regiones como Chubut presentan velocidades significativamente menores.",
            ],
        ),
        Insight::new(
            "Distribución sesgada",
            &["Cuando el promedio supera a la mediana, unas pocas provincias muy rápidas elevan la media nacional."],
        ),
        Insight::new(
            "Oportunidades de mejora",
            &["Las regiones lentas son candidatas a inversión y a tecnologías alternativas como el internet satelital."],
        ),
    ]
}

pub const TECHNOLOGY_INTRO: &str = "Tecnologías de conexión dominantes y su evolución: Fibra óptica, \
ADSL, Cablemódem, Wireless y otras.";

pub const TECHNOLOGY_TRENDS_TEXT: &str = "Evolución trimestral de los accesos por tecnología, \
sumados a nivel nacional.";

pub const TECHNOLOGY_SHARE_TEXT: &str = "Participación de cada tecnología en el total de accesos \
del trimestre seleccionado.";

pub fn technology_insights() -> Vec<Insight> {
    vec![
        Insight::new(
            "Predominio del Cablemódem",
            &["Es la tecnología más utilizada del país por disponibilidad, rendimiento y costo."],
        ),
        Insight::new(
            "Declive de tecnologías antiguas",
            &["ADSL cae de forma sostenida; el dial-up es prácticamente obsoleto."],
        ),
        Insight::new(
            "Crecimiento de la Fibra óptica",
            &["Su adopción se multiplica desde 2014, concentrada en regiones urbanas."],
        ),
        Insight::new(
            "Persistencia del Wireless",
            &["Minoritario pero en aumento, sobre todo en zonas rurales o de difícil acceso."],
        ),
    ]
}

pub const KPI_ACCESS_TEXT: &str = "Objetivo: aumentar el acceso a internet para el próximo trimestre, \
expresado en accesos por cada 100 hogares por provincia. Se compara el acceso actual con el planificado. \
La meta es un valor declarado, no una medición.";

pub const KPI_GROWTH_TEXT: &str = "Variación porcentual trimestral de los accesos de cada tecnología, \
calculada sobre los totales nacionales de cada trimestre.";

pub const KPI_GROWTH_SHORT_TEXT: &str = "Se necesitan al menos dos trimestres para calcular el crecimiento.";

pub fn kpi_growth_notes() -> Vec<Insight> {
    vec![
        Insight::new(
            "Observaciones por tecnología",
            &[
                "ADSL: crecimiento cercano a 0% o negativo, señal de estancamiento.",
                "Cablemodem: variaciones regulares con picos moderados.",
                "Fibra óptica: el mayor crecimiento del período.",
                "Wireless: crecimientos pequeños pero constantes.",
                "Otros: variaciones planas y cercanas a 0.",
            ],
        ),
        Insight::new(
            "Tendencias",
            &[
                "ADSL y Otros están siendo reemplazados por tecnologías más modernas.",
                "Cablemodem y Wireless crecen de forma estable, sin la aceleración de la fibra.",
            ],
        ),
    ]
}
