// ==========================================
// Courtier CRM - 导入模板
// ==========================================
// 固定表头 + 两行示例，可直接导入
// ==========================================

/// 下载时使用的文件名
pub const TEMPLATE_FILE_NAME: &str = "template_import_clients.csv";

pub const TEMPLATE_CSV: &str = "\
nom,prenom,email,telephone,date_naissance,numero_secu,adresse,situation_familiale,nombre_ayants_droit,mutuelle_actuelle,niveau_couverture,statut,notes
Dupont,Jean,jean.dupont@email.com,0123456789,1980-01-15,1234567890123,123 Rue de la Paix 75001 Paris,marie,2,Harmonie Mutuelle,standard,prospect,Premier contact
Martin,Marie,marie.martin@email.com,0987654321,1985-05-20,2345678901234,456 Avenue des Champs 69000 Lyon,celibataire,0,MGEN,premium,client,Client fidèle
";
